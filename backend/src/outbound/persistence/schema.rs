//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes the schema, regenerate them with `diesel print-schema`
//! or update them by hand.

diesel::table! {
    /// User accounts.
    ///
    /// `email` is unique (`users_email_key`); `role` and `status` hold the
    /// upper-case enum names.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Normalised login email.
        email -> Varchar,
        /// Human-readable display name (max 120 characters).
        display_name -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        /// `ADMIN` or `TECNICO`.
        role -> Varchar,
        /// `ACTIVO` or `INACTIVO`.
        status -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Medical equipment inventory.
    equipment (id) {
        id -> Uuid,
        name -> Varchar,
        brand -> Varchar,
        model -> Varchar,
        /// Unique (`equipment_serial_number_key`).
        serial_number -> Varchar,
        control_id -> Varchar,
        location -> Varchar,
        status -> Varchar,
        /// Object key of the manual in the file store.
        manual_key -> Nullable<Text>,
        manual_description -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Maintenance log entries.
    maintenance_records (id) {
        id -> Uuid,
        equipment_id -> Uuid,
        maintenance_type -> Varchar,
        performed_on -> Timestamptz,
        observations -> Text,
        author_id -> Uuid,
        /// Object key of the evidence in the file store.
        evidence_key -> Nullable<Text>,
        next_due -> Nullable<Timestamptz>,
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(maintenance_records -> equipment (equipment_id));
diesel::joinable!(maintenance_records -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(equipment, maintenance_records, users);
