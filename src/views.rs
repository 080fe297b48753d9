use crate::{models, schema, DbConn};
use rocket::serde::json::Json;
use diesel::prelude::*;

/// Audit trail entry written when a document is put up for signing. The
/// client application matches on this exact string.
pub const SENT_FOR_SIGNING_ACTION: &str = "Документ отправлен на подпись";

/// Projection served to the client application. Field names are the
/// client's contract and predate this service.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DocumentView {
    #[serde(rename = "DocumentID")]
    pub document_id: i32,
    #[serde(rename = "DocumentType")]
    pub document_type: String,
    #[serde(rename = "SenderUser")]
    pub sender_user: String,
    #[serde(rename = "SenderUserID")]
    pub sender_user_id: i32,
    #[serde(rename = "ReceiverUser")]
    pub receiver_user: String,
    #[serde(rename = "ReceiverUserID")]
    pub receiver_user_id: i32,
    #[serde(rename = "DocumentStatus")]
    pub document_status: String,
    #[serde(rename = "DocumentContent")]
    pub document_content: String,
    #[serde(rename = "CreationDate")]
    pub creation_date: chrono::NaiveDateTime,
}

impl DocumentView {
    fn new(
        document: models::Document, document_type: models::DocumentType,
        status: models::DocumentStatus, sender: models::User, receiver: models::User,
    ) -> DocumentView {
        DocumentView {
            document_id: document.document_id,
            document_type: document_type.type_name,
            sender_user: sender.user_name,
            sender_user_id: sender.user_id,
            receiver_user: receiver.user_name,
            receiver_user_id: receiver.user_id,
            document_status: status.status_name,
            document_content: document.document_content,
            creation_date: document.creation_date,
        }
    }
}

#[get("/documents")]
pub async fn documents(db: DbConn) -> Result<Json<Vec<DocumentView>>, rocket::http::Status> {
    let rows = crate::db_run(&db, move |c| -> diesel::result::QueryResult<_> {
        schema::documents::dsl::documents
            .inner_join(schema::document_types::dsl::document_types)
            .inner_join(schema::document_status::dsl::document_status)
            .load::<(models::Document, models::DocumentType, models::DocumentStatus)>(c)
    }).await?;

    let user_ids = rows.iter()
        .flat_map(|(d, _, _)| [d.sender_user_id, d.receiver_user_id])
        .collect::<Vec<_>>();
    let users = crate::db_run(&db, move |c| -> diesel::result::QueryResult<_> {
        schema::users::dsl::users
            .filter(schema::users::dsl::user_id.eq_any(user_ids))
            .load::<models::User>(c)
    }).await?
        .into_iter()
        .map(|u| (u.user_id, u))
        .collect::<std::collections::HashMap<_, _>>();

    let mut out = vec![];
    for (document, document_type, status) in rows {
        // inner-join semantics: a document with a dangling user reference
        // drops out of the listing
        let sender = match users.get(&document.sender_user_id) {
            Some(u) => u.clone(),
            None => continue,
        };
        let receiver = match users.get(&document.receiver_user_id) {
            Some(u) => u.clone(),
            None => continue,
        };
        out.push(DocumentView::new(document, document_type, status, sender, receiver));
    }

    Ok(Json(out))
}

#[get("/documents/<did>")]
pub async fn document(did: i32, db: DbConn) -> Result<Json<DocumentView>, rocket::http::Status> {
    let row = crate::db_run(&db, move |c| -> diesel::result::QueryResult<_> {
        let row = schema::documents::dsl::documents
            .inner_join(schema::document_types::dsl::document_types)
            .inner_join(schema::document_status::dsl::document_status)
            .filter(schema::documents::dsl::document_id.eq(did))
            .first::<(models::Document, models::DocumentType, models::DocumentStatus)>(c)
            .optional()?;

        Ok(match row {
            Some((document, document_type, status)) => {
                let sender = schema::users::dsl::users
                    .find(document.sender_user_id)
                    .first::<models::User>(c).optional()?;
                let receiver = schema::users::dsl::users
                    .find(document.receiver_user_id)
                    .first::<models::User>(c).optional()?;
                Some((document, document_type, status, sender, receiver))
            }
            None => None,
        })
    }).await?;

    match row {
        Some((document, document_type, status, Some(sender), Some(receiver))) => {
            Ok(Json(DocumentView::new(document, document_type, status, sender, receiver)))
        }
        _ => Err(rocket::http::Status::NotFound),
    }
}

#[post("/documents/<did>/send-for-signing")]
pub async fn send_for_signing(
    did: i32, user: crate::auth::AuthenticatedUser, db: DbConn,
) -> Result<&'static str, rocket::http::Status> {
    let now = chrono::Utc::now().naive_utc();
    let new_signature = models::NewDocumentSignature {
        document_id: did,
        signer_user_id: user.id,
        signature_date: now,
    };
    let new_history = models::NewDocumentHistory {
        document_id: did,
        action_description: SENT_FOR_SIGNING_ACTION.to_string(),
        action_date: now,
    };

    crate::db_run(&db, move |c| -> diesel::result::QueryResult<_> {
        c.transaction(|| {
            diesel::insert_into(schema::document_signatures::dsl::document_signatures)
                .values(&new_signature)
                .execute(c)?;
            diesel::insert_into(schema::document_history::dsl::document_history)
                .values(&new_history)
                .execute(c)?;
            diesel::update(schema::documents::dsl::documents.find(did))
                .set(schema::documents::dsl::document_status_id
                    .eq(schema::DocumentState::PendingSignature.status_id()))
                .execute(c)?;
            Ok(())
        })
    }).await?;

    Ok("Документ успешно отправлен на подпись")
}

async fn update_status(db: &DbConn, did: i32, state: schema::DocumentState) -> Result<(), rocket::http::Status> {
    // no precondition on the current status, and an update matching zero
    // rows still answers 200
    crate::db_run(db, move |c| -> diesel::result::QueryResult<_> {
        diesel::update(schema::documents::dsl::documents.find(did))
            .set(schema::documents::dsl::document_status_id.eq(state.status_id()))
            .execute(c)
    }).await?;
    Ok(())
}

#[post("/documents/<did>/sign")]
pub async fn sign(did: i32, db: DbConn) -> Result<&'static str, rocket::http::Status> {
    update_status(&db, did, schema::DocumentState::Signed).await?;
    Ok("Документ успешно подписан")
}

#[post("/documents/<did>/reject")]
pub async fn reject(did: i32, db: DbConn) -> Result<&'static str, rocket::http::Status> {
    update_status(&db, did, schema::DocumentState::Rejected).await?;
    Ok("Документ успешно отклонен")
}

#[get("/users")]
pub async fn users(db: DbConn) -> Result<Json<Vec<models::User>>, rocket::http::Status> {
    let users = crate::db_run(&db, move |c| -> diesel::result::QueryResult<_> {
        schema::users::dsl::users.load::<models::User>(c)
    }).await?;

    Ok(Json(users))
}

#[get("/users/<uid>")]
pub async fn user(uid: i32, db: DbConn) -> Result<Json<models::User>, rocket::http::Status> {
    let user = crate::db_run(&db, move |c| -> diesel::result::QueryResult<_> {
        schema::users::dsl::users.find(uid).first::<models::User>(c).optional()
    }).await?;

    match user {
        Some(u) => Ok(Json(u)),
        None => Err(rocket::http::Status::NotFound),
    }
}

#[catch(401)]
pub fn unauthorized() -> &'static str {
    "Пользователь не аутентифицирован"
}

#[catch(404)]
pub fn document_not_found() -> &'static str {
    "Документ не найден"
}

#[catch(404)]
pub fn user_not_found() -> &'static str {
    "Пользователь не найден"
}

#[catch(500)]
pub fn server_error() -> &'static str {
    "Ошибка сервера"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_view() -> DocumentView {
        DocumentView::new(
            models::Document {
                document_id: 42,
                document_type_id: 1,
                sender_user_id: 7,
                receiver_user_id: 9,
                document_status_id: 1,
                document_content: "Договор поставки".to_string(),
                creation_date: chrono::NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
                    .and_hms_opt(10, 30, 0).unwrap(),
            },
            models::DocumentType {
                document_type_id: 1,
                type_name: "Договор".to_string(),
            },
            models::DocumentStatus {
                status_id: 1,
                status_name: "На подписи".to_string(),
            },
            models::User {
                user_id: 7,
                user_name: "Артем".to_string(),
            },
            models::User {
                user_id: 9,
                user_name: "Ирина".to_string(),
            },
        )
    }

    #[test]
    fn document_view_serializes_with_client_field_names() {
        let value = serde_json::to_value(&sample_view()).unwrap();

        assert_eq!(value["DocumentID"], 42);
        assert_eq!(value["DocumentType"], "Договор");
        assert_eq!(value["SenderUser"], "Артем");
        assert_eq!(value["SenderUserID"], 7);
        assert_eq!(value["ReceiverUser"], "Ирина");
        assert_eq!(value["ReceiverUserID"], 9);
        assert_eq!(value["DocumentStatus"], "На подписи");
        assert_eq!(value["DocumentContent"], "Договор поставки");
        assert_eq!(value.as_object().unwrap().len(), 9);
    }

    #[test]
    fn audit_action_description_is_fixed() {
        assert_eq!(SENT_FOR_SIGNING_ACTION, "Документ отправлен на подпись");
    }

    #[test]
    fn scoped_catchers_answer_with_plain_text_bodies() {
        let rocket = rocket::build()
            .register("/api", rocket::catchers![unauthorized, server_error])
            .register("/api/documents", rocket::catchers![document_not_found])
            .register("/api/users", rocket::catchers![user_not_found]);
        let client = rocket::local::blocking::Client::tracked(rocket).expect("valid rocket instance");

        let response = client.get("/api/documents/42").dispatch();
        assert_eq!(response.status(), rocket::http::Status::NotFound);
        assert_eq!(response.into_string().unwrap(), "Документ не найден");

        let response = client.get("/api/users/42").dispatch();
        assert_eq!(response.status(), rocket::http::Status::NotFound);
        assert_eq!(response.into_string().unwrap(), "Пользователь не найден");
    }
}
