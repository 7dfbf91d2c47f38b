use clap::Subcommand;

/// Appointment commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AppointmentCommands {
    /// Schedule an appointment.
    Create {
        #[arg(long)]
        patient: String,
        #[arg(long)]
        title: String,
        /// RFC 3339 start time
        #[arg(long)]
        start: String,
        /// RFC 3339 end time
        #[arg(long)]
        end: String,
    },
    /// Get an appointment by ID.
    Get { id: String },
    /// List appointments by start time.
    List {
        /// UPCOMING, COMPLETED, CANCELLED
        #[arg(long)]
        status: Option<String>,
    },
    /// Cancel an upcoming appointment.
    Cancel {
        id: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Link an appointment to an external calendar event.
    Link {
        id: String,
        #[arg(long)]
        provider: String,
        #[arg(long)]
        external_id: String,
    },
}
