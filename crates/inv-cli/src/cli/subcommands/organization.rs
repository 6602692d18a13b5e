use clap::Subcommand;

/// University commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UniversityCommands {
    /// Create a university (admin).
    Create {
        name: String,
        #[arg(long)]
        address: Option<String>,
    },
    /// Get a university by ID.
    Get { id: String },
    /// List universities.
    List,
    /// Update a university (admin).
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// Delete a university and everything under it (admin).
    Delete { id: String },
}

/// Building commands.
#[derive(Clone, Debug, Subcommand)]
pub enum BuildingCommands {
    /// Create a building (admin).
    Create {
        name: String,
        #[arg(long)]
        university: String,
        #[arg(long)]
        address: Option<String>,
    },
    /// Get a building by ID.
    Get { id: String },
    /// List buildings, optionally of one university.
    List {
        #[arg(long)]
        university: Option<String>,
    },
    /// Update a building (admin).
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// Delete a building (admin).
    Delete { id: String },
}

/// Floor commands.
#[derive(Clone, Debug, Subcommand)]
pub enum FloorCommands {
    /// Create a floor (admin).
    Create {
        #[arg(long)]
        building: String,
        /// Floor number; basements are negative.
        #[arg(long, allow_negative_numbers = true)]
        number: i64,
        #[arg(long)]
        description: Option<String>,
    },
    /// Get a floor by ID.
    Get { id: String },
    /// List floors of a building.
    List {
        #[arg(long)]
        building: String,
    },
    /// Delete a floor (admin).
    Delete { id: String },
}

/// Faculty commands.
#[derive(Clone, Debug, Subcommand)]
pub enum FacultyCommands {
    /// Create a faculty (admin).
    Create {
        name: String,
        #[arg(long)]
        building: String,
        #[arg(long)]
        floor: Option<String>,
    },
    /// Get a faculty by ID.
    Get { id: String },
    /// List faculties of a building.
    List {
        #[arg(long)]
        building: String,
    },
    /// Delete a faculty (admin).
    Delete { id: String },
    /// Split a faculty into new ones (admin).
    Split {
        id: String,
        /// Names of the resulting faculties.
        #[arg(long = "into", required = true)]
        names: Vec<String>,
    },
    /// Merge faculties into a new one (admin).
    Merge {
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        building: String,
        #[arg(long)]
        floor: Option<String>,
    },
    /// Transfer a faculty to another building or floor (admin).
    Move {
        id: String,
        #[arg(long)]
        building: String,
        #[arg(long)]
        floor: Option<String>,
    },
    /// Restructuring history of a faculty.
    History { id: String },
}

/// Room commands.
#[derive(Clone, Debug, Subcommand)]
pub enum RoomCommands {
    /// Create a room (admin).
    Create {
        number: String,
        #[arg(long)]
        building: String,
        #[arg(long)]
        floor: String,
        #[arg(long)]
        name: Option<String>,
        /// Mark the room as special-purpose.
        #[arg(long)]
        special: bool,
    },
    /// Get a room by ID.
    Get { id: String },
    /// List rooms, optionally filtered by building or floor.
    List {
        #[arg(long)]
        building: Option<String>,
        #[arg(long)]
        floor: Option<String>,
    },
    /// Update a room (admin).
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        special: Option<bool>,
    },
    /// Delete a room (admin). Its equipment is left without a room.
    Delete { id: String },
    /// Split a room into new ones (admin).
    Split {
        id: String,
        /// Numbers of the resulting rooms.
        #[arg(long = "into", required = true)]
        numbers: Vec<String>,
    },
    /// Merge rooms into a new one (admin).
    Merge {
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long)]
        number: String,
        #[arg(long)]
        building: String,
        #[arg(long)]
        floor: String,
    },
    /// Transfer a room to another floor (admin).
    Move {
        id: String,
        #[arg(long)]
        building: String,
        #[arg(long)]
        floor: String,
    },
    /// Restructuring history of a room.
    History { id: String },
    /// Resolve a shareable room URL.
    Link { url: String },
    /// Equipment in a room, grouped by type.
    Equipment { id: String },
}
