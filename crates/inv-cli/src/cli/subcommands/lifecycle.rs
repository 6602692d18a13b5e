use clap::Subcommand;

/// Repair commands.
#[derive(Clone, Debug, Subcommand)]
pub enum RepairCommands {
    /// Send an item to repair.
    Start {
        equipment_id: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Close a repair as completed or failed.
    Update {
        id: String,
        /// New status: in_progress, completed, failed.
        status: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Get a repair by ID.
    Get { id: String },
    /// The repair record of an item, if any.
    Of { equipment_id: String },
    /// List repairs.
    List {
        #[arg(long)]
        status: Option<String>,
    },
}

/// Disposal commands.
#[derive(Clone, Debug, Subcommand)]
pub enum DisposalCommands {
    /// Dispose an item.
    Create {
        equipment_id: String,
        #[arg(long)]
        reason: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Edit the reason or notes of a disposal.
    Update {
        id: String,
        #[arg(long)]
        reason: Option<String>,
        #[arg(long, conflicts_with = "clear_notes")]
        notes: Option<String>,
        #[arg(long)]
        clear_notes: bool,
    },
    /// Get a disposal by ID.
    Get { id: String },
    /// The disposal record of an item, if any.
    Of { equipment_id: String },
    /// List disposals.
    List,
}
