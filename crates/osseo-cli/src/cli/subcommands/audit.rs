use clap::Subcommand;

/// Audit history commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuditCommands {
    /// History of one record, newest first.
    Show {
        /// PATIENT, OPERATION, IMPLANT, DOCUMENT, RADIO, APPOINTMENT, VISIT, PROSTHESIS
        entity_type: String,
        entity_id: String,
    },
    /// Append an entry to the audit log.
    Record {
        entity_type: String,
        entity_id: String,
        /// CREATE, UPDATE, DELETE, VIEW, ARCHIVE, RESTORE
        action: String,
        #[arg(long)]
        details: Option<String>,
        /// JSON payload stored as entry metadata
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Recent entries across records.
    List {
        #[arg(long)]
        entity_type: Option<String>,
        #[arg(long)]
        entity_id: Option<String>,
        #[arg(long)]
        action: Option<String>,
        #[arg(long)]
        actor_id: Option<String>,
        /// RFC 3339 lower bound (inclusive)
        #[arg(long)]
        since: Option<String>,
        /// RFC 3339 upper bound (exclusive)
        #[arg(long)]
        until: Option<String>,
    },
}
