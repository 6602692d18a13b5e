use clap::Subcommand;

/// Equipment type commands.
#[derive(Clone, Debug, Subcommand)]
pub enum EquipmentTypeCommands {
    /// Create an equipment type (admin).
    Create { name: String },
    /// Get an equipment type by ID.
    Get { id: String },
    /// List equipment types.
    List,
    /// Delete an unused equipment type (admin).
    Delete { id: String },
}

/// Contract document commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ContractCommands {
    /// Register a contract.
    Create {
        number: String,
        #[arg(long)]
        file: Option<String>,
        /// Expiry date as YYYY-MM-DD.
        #[arg(long)]
        valid_until: Option<String>,
    },
    /// Get a contract by ID.
    Get { id: String },
    /// List contracts.
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Update a contract.
    Update {
        id: String,
        #[arg(long)]
        number: Option<String>,
        #[arg(long)]
        file: Option<String>,
        #[arg(long)]
        valid_until: Option<String>,
    },
    /// Delete a contract. Equipment referencing it keeps no contract.
    Delete { id: String },
}

/// Characteristic template commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SpecCommands {
    /// Save a characteristic template.
    Create {
        name: String,
        /// Characteristics as JSON tagged by `kind`.
        #[arg(long)]
        characteristics: String,
    },
    /// Get a template by ID.
    Get { id: String },
    /// List templates, optionally of one kind.
    List {
        #[arg(long)]
        kind: Option<String>,
    },
    /// Update a template.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        characteristics: Option<String>,
    },
    /// Delete a template.
    Delete { id: String },
    /// Number of templates per kind.
    Count,
}
