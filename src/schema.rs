/// Workflow states a document can be moved into. The draft state a document
/// is created with by the external document creator has no code here; the
/// transition handlers only ever write one of these three.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentState {
    PendingSignature,
    Signed,
    Rejected,
}

impl DocumentState {
    pub fn status_id(self) -> i32 {
        match self {
            Self::PendingSignature => 1,
            Self::Signed => 2,
            Self::Rejected => 3,
        }
    }
}

impl ToString for DocumentState {
    fn to_string(&self) -> String {
        match self {
            Self::PendingSignature => "pending-signature",
            Self::Signed => "signed",
            Self::Rejected => "rejected",
        }.to_string()
    }
}

table! {
    documents (document_id) {
        document_id -> Int4,
        document_type_id -> Int4,
        sender_user_id -> Int4,
        receiver_user_id -> Int4,
        document_status_id -> Int4,
        document_content -> Text,
        creation_date -> Timestamp,
    }
}

table! {
    document_types (document_type_id) {
        document_type_id -> Int4,
        type_name -> Varchar,
    }
}

table! {
    users (user_id) {
        user_id -> Int4,
        user_name -> Varchar,
    }
}

table! {
    document_status (status_id) {
        status_id -> Int4,
        status_name -> Varchar,
    }
}

table! {
    document_signatures (signature_id) {
        signature_id -> Int4,
        document_id -> Int4,
        signer_user_id -> Int4,
        signature_date -> Timestamp,
    }
}

table! {
    document_history (history_id) {
        history_id -> Int4,
        document_id -> Int4,
        action_description -> Varchar,
        action_date -> Timestamp,
    }
}

joinable!(documents -> document_types (document_type_id));
joinable!(documents -> document_status (document_status_id));
// documents references users twice (sender and receiver), so no joinable!
// is declared for that pair; user rows are resolved with separate queries.
joinable!(document_signatures -> documents (document_id));
joinable!(document_signatures -> users (signer_user_id));
joinable!(document_history -> documents (document_id));

allow_tables_to_appear_in_same_query!(
    documents,
    document_types,
    users,
    document_status,
    document_signatures,
    document_history,
);
