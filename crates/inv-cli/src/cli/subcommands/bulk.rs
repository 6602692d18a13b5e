use clap::Subcommand;

/// Batch equipment commands.
#[derive(Clone, Debug, Subcommand)]
pub enum BulkCommands {
    /// Create identical items named "<prefix> <n>".
    Create {
        #[arg(long = "type")]
        type_id: String,
        #[arg(long)]
        prefix: String,
        #[arg(long)]
        count: u32,
        #[arg(long)]
        room: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        contract: Option<String>,
        #[arg(long, conflicts_with = "characteristics")]
        spec: Option<String>,
        #[arg(long)]
        characteristics: Option<String>,
    },
    /// Assign inventory numbers, given as ID=INN pairs.
    Inn {
        #[arg(required = true)]
        assignments: Vec<String>,
    },
    /// Delete several items.
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}
