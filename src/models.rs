use crate::schema::*;

#[derive(Queryable, Identifiable, AsChangeset, Serialize, Deserialize, Clone, Debug)]
#[table_name="documents"]
#[primary_key(document_id)]
pub struct Document {
    pub document_id: i32,
    pub document_type_id: i32,
    pub sender_user_id: i32,
    pub receiver_user_id: i32,
    pub document_status_id: i32,
    pub document_content: String,
    pub creation_date: chrono::NaiveDateTime,
}

#[derive(Queryable, Identifiable, Serialize, Deserialize, Clone, Debug)]
#[table_name="users"]
#[primary_key(user_id)]
pub struct User {
    #[serde(rename = "UserID")]
    pub user_id: i32,
    #[serde(rename = "UserName")]
    pub user_name: String,
}

#[derive(Queryable, Identifiable, Serialize, Deserialize, Clone, Debug)]
#[table_name="document_types"]
#[primary_key(document_type_id)]
pub struct DocumentType {
    pub document_type_id: i32,
    pub type_name: String,
}

#[derive(Queryable, Identifiable, Serialize, Deserialize, Clone, Debug)]
#[table_name="document_status"]
#[primary_key(status_id)]
pub struct DocumentStatus {
    pub status_id: i32,
    pub status_name: String,
}

#[derive(Queryable, Identifiable, Serialize, Deserialize, Clone, Debug)]
#[table_name="document_signatures"]
#[primary_key(signature_id)]
pub struct DocumentSignature {
    pub signature_id: i32,
    pub document_id: i32,
    pub signer_user_id: i32,
    pub signature_date: chrono::NaiveDateTime,
}

#[derive(Insertable, Clone, Debug)]
#[table_name="document_signatures"]
pub struct NewDocumentSignature {
    pub document_id: i32,
    pub signer_user_id: i32,
    pub signature_date: chrono::NaiveDateTime,
}

#[derive(Queryable, Identifiable, Serialize, Deserialize, Clone, Debug)]
#[table_name="document_history"]
#[primary_key(history_id)]
pub struct DocumentHistory {
    pub history_id: i32,
    pub document_id: i32,
    pub action_description: String,
    pub action_date: chrono::NaiveDateTime,
}

#[derive(Insertable, Clone, Debug)]
#[table_name="document_history"]
pub struct NewDocumentHistory {
    pub document_id: i32,
    pub action_description: String,
    pub action_date: chrono::NaiveDateTime,
}
