pub mod applications;
pub mod health;
pub mod loans;
pub mod swagger;
pub mod users;

use actix_web::HttpResponse;
use mongodb::bson::oid::ObjectId;

/// Path ids are 24-char hex ObjectIds; anything else is a client error.
pub(crate) fn parse_object_id(id: &str) -> Result<ObjectId, HttpResponse> {
    ObjectId::parse_str(id).map_err(|e| {
        HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": format!("Invalid id '{}': {}", id, e)
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_object_id_accepts_hex_and_rejects_garbage() {
        let oid = ObjectId::new();
        assert_eq!(parse_object_id(&oid.to_hex()).unwrap(), oid);
        assert!(parse_object_id("not-an-id").is_err());
        assert!(parse_object_id("").is_err());
    }
}
