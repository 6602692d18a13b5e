use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Equipment commands.
#[derive(Clone, Debug, Subcommand)]
pub enum EquipmentCommands {
    /// Register an equipment item.
    Create(EquipmentCreateArgs),
    /// Register an item in the room a shared room URL points to.
    FromLink {
        url: String,
        #[arg(long)]
        name: String,
        #[arg(long = "type")]
        type_id: String,
        #[arg(long)]
        inn: Option<i64>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Get an item by ID.
    Get { id: String },
    /// List items with filters and pagination.
    List(EquipmentListArgs),
    /// Update an item.
    Update(EquipmentUpdateArgs),
    /// Delete an item.
    Delete { id: String },
    /// Items registered by the current user.
    Mine,
    /// Human-readable location of an item.
    Location { id: String },
    /// Movement history of an item.
    Movements { id: String },
    /// Write printable QR labels (SVG) for items with an inventory number.
    Labels {
        #[arg(required = true)]
        ids: Vec<String>,
        /// Directory for the label files, relative to the project root.
        #[arg(long, default_value = "labels")]
        out: PathBuf,
    },
}

#[derive(Clone, Debug, Args)]
pub struct EquipmentCreateArgs {
    pub name: String,
    #[arg(long = "type")]
    pub type_id: String,
    #[arg(long)]
    pub room: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Initial lifecycle status (new, working, needs_repair, disposed).
    #[arg(long)]
    pub status: Option<String>,
    /// Inventory number; 0 or absent means unassigned.
    #[arg(long)]
    pub inn: Option<i64>,
    #[arg(long)]
    pub contract: Option<String>,
    /// Characteristics as JSON tagged by `kind`.
    #[arg(long, conflicts_with = "spec")]
    pub characteristics: Option<String>,
    /// Copy characteristics from a saved template.
    #[arg(long)]
    pub spec: Option<String>,
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Clone, Debug, Args)]
pub struct EquipmentListArgs {
    #[arg(long)]
    pub building: Option<String>,
    #[arg(long)]
    pub floor: Option<String>,
    #[arg(long)]
    pub room: Option<String>,
    #[arg(long = "type")]
    pub type_id: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    /// Substring match on name, description or inventory number.
    #[arg(long)]
    pub search: Option<String>,
    /// Created on or after this day (YYYY-MM-DD, UTC).
    #[arg(long)]
    pub created_from: Option<String>,
    /// Created on or before this day (YYYY-MM-DD, UTC).
    #[arg(long)]
    pub created_to: Option<String>,
    #[arg(long)]
    pub active: Option<bool>,
    /// User ID of the author.
    #[arg(long)]
    pub author: Option<String>,
    #[command(flatten)]
    pub characteristics: CharacteristicArgs,
}

/// Characteristic filters. Text values match case-insensitive substrings.
#[derive(Clone, Debug, Default, Args)]
pub struct CharacteristicArgs {
    #[arg(long)]
    pub cpu: Option<String>,
    #[arg(long)]
    pub ram: Option<String>,
    #[arg(long)]
    pub has_keyboard: Option<bool>,
    #[arg(long)]
    pub has_mouse: Option<bool>,
    /// Built-in screen of notebooks and monoblocks.
    #[arg(long)]
    pub monitor_size: Option<String>,
    #[arg(long)]
    pub printer_model: Option<String>,
    #[arg(long)]
    pub printer_color: Option<bool>,
    #[arg(long)]
    pub printer_duplex: Option<bool>,
    #[arg(long)]
    pub router_model: Option<String>,
    #[arg(long)]
    pub router_ports: Option<u32>,
    #[arg(long)]
    pub router_wifi: Option<String>,
    #[arg(long)]
    pub tv_model: Option<String>,
    #[arg(long)]
    pub tv_screen_size: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct EquipmentUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub room: Option<String>,
    #[arg(long)]
    pub inn: Option<i64>,
    #[arg(long)]
    pub contract: Option<String>,
    #[arg(long)]
    pub active: Option<bool>,
    #[arg(long)]
    pub characteristics: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
}
