use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    ActionsCommands, BuildingCommands, BulkCommands, ContractCommands, DisposalCommands,
    EquipmentCommands, EquipmentTypeCommands, FacultyCommands, FloorCommands, RepairCommands,
    RoomCommands, SpecCommands, SupportCommands, UniversityCommands, UserCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Initialize an inventory project in the current directory.
    Init(InitArgs),
    /// Universities.
    University {
        #[command(subcommand)]
        action: UniversityCommands,
    },
    /// Buildings of a university.
    Building {
        #[command(subcommand)]
        action: BuildingCommands,
    },
    /// Floors of a building.
    Floor {
        #[command(subcommand)]
        action: FloorCommands,
    },
    /// Faculties, including split, merge and transfer.
    Faculty {
        #[command(subcommand)]
        action: FacultyCommands,
    },
    /// Rooms, including split, merge and transfer.
    Room {
        #[command(subcommand)]
        action: RoomCommands,
    },
    /// Equipment types.
    EquipmentType {
        #[command(subcommand)]
        action: EquipmentTypeCommands,
    },
    /// Contract documents.
    Contract {
        #[command(subcommand)]
        action: ContractCommands,
    },
    /// Equipment items.
    Equipment {
        #[command(subcommand)]
        action: EquipmentCommands,
    },
    /// Characteristic templates.
    Spec {
        #[command(subcommand)]
        action: SpecCommands,
    },
    /// Repair records.
    Repair {
        #[command(subcommand)]
        action: RepairCommands,
    },
    /// Disposal records.
    Disposal {
        #[command(subcommand)]
        action: DisposalCommands,
    },
    /// Move equipment between rooms.
    Move(MoveArgs),
    /// Batch operations on equipment.
    Bulk {
        #[command(subcommand)]
        action: BulkCommands,
    },
    /// Users.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Support messages.
    Support {
        #[command(subcommand)]
        action: SupportCommands,
    },
    /// Audit log.
    Actions {
        #[command(subcommand)]
        action: ActionsCommands,
    },
    /// Resolve scanned QR label data.
    Scan(ScanArgs),
    /// Equipment distribution report.
    Stats,
}

/// Arguments for `cinv init`.
#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Create the first admin with this username.
    #[arg(long)]
    pub admin: Option<String>,
    #[arg(long, requires = "admin")]
    pub first_name: Option<String>,
    #[arg(long, requires = "admin")]
    pub last_name: Option<String>,
}

/// Arguments for `cinv move`.
#[derive(Clone, Debug, Args)]
pub struct MoveArgs {
    /// Room the items currently stand in.
    #[arg(long)]
    pub from: String,
    /// Destination room.
    #[arg(long)]
    pub to: String,
    #[arg(long)]
    pub note: Option<String>,
    /// Equipment IDs to move.
    #[arg(required = true)]
    pub ids: Vec<String>,
}

/// Arguments for `cinv scan`.
#[derive(Clone, Debug, Args)]
pub struct ScanArgs {
    /// What the label belongs to: room or equipment.
    pub object_type: String,
    /// Scanned label text (room uid, equipment payload or equipment uid).
    pub data: String,
}
