use clap::Subcommand;

/// User commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Create the first admin of an empty database.
    Bootstrap {
        username: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Create a user (admin).
    Create {
        username: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        /// Role: admin or manager.
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Get a user by ID.
    Get { id: String },
    /// Show the acting user.
    Whoami,
    /// List users (admin).
    List,
    /// Update a user.
    Update {
        id: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    /// Delete a user (admin).
    Delete { id: String },
    /// Activate or deactivate a user (admin).
    ToggleActive { id: String },
}

/// Support message commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SupportCommands {
    /// Send a message to the administrators.
    Send {
        #[arg(long)]
        subject: String,
        message: String,
    },
    /// List messages (admins see all).
    List {
        /// Only messages no admin has been notified about.
        #[arg(long)]
        new: bool,
    },
    /// Mark messages as notified (admin).
    MarkNotified {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Resolve a message (admin).
    Resolve { id: String },
    /// Delete a message (admin).
    Delete { id: String },
}
