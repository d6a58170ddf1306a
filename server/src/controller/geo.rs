use actix_web::dev::HttpServiceFactory;
use actix_web::{get, web, HttpResponse, Responder};

use serde::Serialize;

use bloodlink::geo::Geography;

use crate::error::{RestError, RestResult};

#[derive(Debug, Serialize)]
struct DistrictSummary<'a> {
    id: u32,
    name: &'a str,
}

/// The bundled district list
#[tracing::instrument(name = "List districts")]
#[get("/districts")]
async fn districts() -> RestResult<impl Responder> {
    let districts: Vec<DistrictSummary<'_>> = Geography::bundled()
        .districts()
        .iter()
        .map(|d| DistrictSummary {
            id: d.id,
            name: &d.name,
        })
        .collect();

    Ok(HttpResponse::Ok().json(districts))
}

/// Upazilas for one district
#[tracing::instrument(name = "List upazilas")]
#[get("/districts/{id}/upazilas")]
async fn upazilas(id: web::Path<u32>) -> RestResult<impl Responder> {
    let district = Geography::bundled()
        .district(*id)
        .ok_or(RestError::NotFound)?;

    Ok(HttpResponse::Ok().json(&district.upazilas))
}

/// Geography API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/geo").service(districts).service(upazilas)
}
