//! # REST API for Pet Management
//!
//! Endpoints for creating, retrieving, updating, and deleting pets.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::domain::commands::pets::{CreatePetCommand, UpdatePetCommand};
use crate::domain::models::Pet;
use crate::AppState;
use shared::{CreatePetRequest, PetDto, UpdatePetRequest};

pub(crate) fn pet_to_dto(pet: Pet) -> PetDto {
    PetDto {
        id: pet.id,
        name: pet.name,
        species: pet.species,
        breed: pet.breed,
        birthdate: pet.birthdate,
    }
}

/// Create a new pet
pub async fn create_pet(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<CreatePetRequest>,
) -> impl IntoResponse {
    info!("POST /api/users/{}/pets - request: {:?}", user_id, request);

    let command = CreatePetCommand {
        user_id,
        name: request.name,
        species: request.species,
        breed: request.breed,
        birthdate: request.birthdate,
    };

    match state.pet_service.create_pet(command) {
        Ok(result) => (StatusCode::CREATED, Json(pet_to_dto(result.pet))).into_response(),
        Err(e) => {
            error!("Failed to create pet: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Get a pet by ID
pub async fn get_pet(
    State(state): State<AppState>,
    Path((user_id, pet_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/pets/{}", user_id, pet_id);

    match state.pet_service.get_pet(&user_id, &pet_id) {
        Ok(Some(pet)) => (StatusCode::OK, Json(pet_to_dto(pet))).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Pet not found").into_response(),
        Err(e) => {
            error!("Failed to get pet: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving pet").into_response()
        }
    }
}

/// List all pets for a user
pub async fn list_pets(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/pets", user_id);

    match state.pet_service.list_pets(&user_id) {
        Ok(pets) => {
            let dtos: Vec<PetDto> = pets.into_iter().map(pet_to_dto).collect();
            (StatusCode::OK, Json(dtos)).into_response()
        }
        Err(e) => {
            error!("Failed to list pets: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing pets").into_response()
        }
    }
}

/// Update a pet
pub async fn update_pet(
    State(state): State<AppState>,
    Path((user_id, pet_id)): Path<(String, String)>,
    Json(request): Json<UpdatePetRequest>,
) -> impl IntoResponse {
    info!(
        "PUT /api/users/{}/pets/{} - request: {:?}",
        user_id, pet_id, request
    );

    let command = UpdatePetCommand {
        user_id,
        pet_id,
        name: request.name,
        species: request.species,
        breed: request.breed.map(Some),
        birthdate: request.birthdate.map(Some),
    };

    match state.pet_service.update_pet(command) {
        Ok(result) => (StatusCode::OK, Json(pet_to_dto(result.pet))).into_response(),
        Err(e) => {
            error!("Failed to update pet: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_REQUEST
            };
            (status, e.to_string()).into_response()
        }
    }
}

/// Delete a pet. Refused while unarchived tasks still reference it.
pub async fn delete_pet(
    State(state): State<AppState>,
    Path((user_id, pet_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/users/{}/pets/{}", user_id, pet_id);

    match state.pet_service.delete_pet(&user_id, &pet_id) {
        Ok(true) => (StatusCode::NO_CONTENT, "").into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Pet not found").into_response(),
        Err(e) => {
            error!("Failed to delete pet: {}", e);
            let status = if e.to_string().contains("active task") {
                StatusCode::CONFLICT
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string()).into_response()
        }
    }
}
