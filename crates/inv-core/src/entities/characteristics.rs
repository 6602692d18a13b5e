use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{CharacteristicKind, DiskType, PanelType, ThrowType, TouchType};

/// A storage device installed in a computer-class item.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Disk {
    pub disk_type: DiskType,
    pub capacity_gb: u32,
}

/// A graphics adapter installed in a computer-class item.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Gpu {
    pub model: String,
}

const fn default_extender_ports() -> u32 {
    4
}

/// Type-specific attribute set of an equipment item or specification template.
///
/// Stored as a JSON column tagged by `kind`. The variant must agree with the
/// `CharacteristicKind` derived from the item's equipment type name.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Characteristics {
    Computer {
        cpu: String,
        ram: String,
        #[serde(default)]
        has_keyboard: bool,
        #[serde(default)]
        has_mouse: bool,
        #[serde(default)]
        disks: Vec<Disk>,
        #[serde(default)]
        gpus: Vec<Gpu>,
    },
    Notebook {
        cpu: String,
        ram: String,
        monitor_size: String,
        #[serde(default)]
        disks: Vec<Disk>,
        #[serde(default)]
        gpus: Vec<Gpu>,
    },
    Monoblok {
        cpu: String,
        ram: String,
        #[serde(default)]
        has_keyboard: bool,
        #[serde(default)]
        has_mouse: bool,
        monitor_size: String,
        #[serde(default)]
        disks: Vec<Disk>,
        #[serde(default)]
        gpus: Vec<Gpu>,
    },
    Printer {
        model: String,
        serial_number: String,
        #[serde(default)]
        color: bool,
        #[serde(default)]
        duplex: bool,
    },
    Extender {
        #[serde(default = "default_extender_ports")]
        ports: u32,
        length: String,
    },
    Router {
        model: String,
        serial_number: String,
        ports: u32,
        wifi_standard: String,
    },
    Tv {
        model: String,
        serial_number: String,
        screen_size: u32,
    },
    Projector {
        model: String,
        lumens: u32,
        resolution: String,
        #[serde(default)]
        throw_type: ThrowType,
    },
    Whiteboard {
        model: String,
        screen_size: u32,
        #[serde(default)]
        touch_type: TouchType,
    },
    Monitor {
        model: String,
        serial_number: String,
        screen_size: u32,
        resolution: String,
        #[serde(default)]
        panel_type: PanelType,
        refresh_rate: Option<u32>,
    },
}

impl Characteristics {
    /// The family this attribute set belongs to.
    #[must_use]
    pub const fn kind(&self) -> CharacteristicKind {
        match self {
            Self::Computer { .. } => CharacteristicKind::Computer,
            Self::Notebook { .. } => CharacteristicKind::Notebook,
            Self::Monoblok { .. } => CharacteristicKind::Monoblok,
            Self::Printer { .. } => CharacteristicKind::Printer,
            Self::Extender { .. } => CharacteristicKind::Extender,
            Self::Router { .. } => CharacteristicKind::Router,
            Self::Tv { .. } => CharacteristicKind::Tv,
            Self::Projector { .. } => CharacteristicKind::Projector,
            Self::Whiteboard { .. } => CharacteristicKind::Whiteboard,
            Self::Monitor { .. } => CharacteristicKind::Monitor,
        }
    }

    /// Installed disks. Empty for families without components.
    #[must_use]
    pub fn disks(&self) -> &[Disk] {
        match self {
            Self::Computer { disks, .. }
            | Self::Notebook { disks, .. }
            | Self::Monoblok { disks, .. } => disks,
            _ => &[],
        }
    }

    /// Installed GPUs. Empty for families without components.
    #[must_use]
    pub fn gpus(&self) -> &[Gpu] {
        match self {
            Self::Computer { gpus, .. }
            | Self::Notebook { gpus, .. }
            | Self::Monoblok { gpus, .. } => gpus,
            _ => &[],
        }
    }

    /// Use the inventory number as serial number when none was given.
    ///
    /// Only printers, routers, TVs and monitors carry a serial number; an
    /// `inn` of 0 leaves it empty.
    pub fn fill_serial_number(&mut self, inn: i64) {
        if inn == 0 {
            return;
        }
        match self {
            Self::Printer { serial_number, .. }
            | Self::Router { serial_number, .. }
            | Self::Tv { serial_number, .. }
            | Self::Monitor { serial_number, .. } => {
                if serial_number.trim().is_empty() {
                    *serial_number = inn.to_string();
                }
            }
            _ => {}
        }
    }

    /// Total disk capacity in gigabytes.
    #[must_use]
    pub fn total_disk_gb(&self) -> u64 {
        self.disks().iter().map(|d| u64::from(d.capacity_gb)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tagged_json_shape() {
        let c = Characteristics::Printer {
            model: "LaserJet".into(),
            serial_number: "SN-1".into(),
            color: true,
            duplex: false,
        };
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["kind"], "printer");
        assert_eq!(json["model"], "LaserJet");
        assert_eq!(c.kind(), CharacteristicKind::Printer);
    }

    #[test]
    fn extender_ports_default_to_four() {
        let c: Characteristics =
            serde_json::from_str(r#"{"kind":"extender","length":"5m"}"#).unwrap();
        assert_eq!(
            c,
            Characteristics::Extender {
                ports: 4,
                length: "5m".into()
            }
        );
    }

    #[test]
    fn components_only_on_computer_class() {
        let pc = Characteristics::Computer {
            cpu: "i5".into(),
            ram: "16GB".into(),
            has_keyboard: true,
            has_mouse: true,
            disks: vec![
                Disk {
                    disk_type: DiskType::Ssd,
                    capacity_gb: 512,
                },
                Disk {
                    disk_type: DiskType::Hdd,
                    capacity_gb: 1000,
                },
            ],
            gpus: vec![Gpu {
                model: "GTX 1650".into(),
            }],
        };
        assert_eq!(pc.total_disk_gb(), 1512);
        assert_eq!(pc.gpus().len(), 1);

        let tv = Characteristics::Tv {
            model: "Samsung".into(),
            serial_number: "T-1".into(),
            screen_size: 55,
        };
        assert!(tv.disks().is_empty());
        assert!(tv.gpus().is_empty());
    }

    #[test]
    fn serial_number_defaults_to_inn() {
        let mut router = Characteristics::Router {
            model: "Keenetic".into(),
            serial_number: " ".into(),
            ports: 4,
            wifi_standard: "802.11ax".into(),
        };
        router.fill_serial_number(7001);
        assert!(matches!(&router, Characteristics::Router { serial_number, .. } if serial_number == "7001"));

        let mut printer = Characteristics::Printer {
            model: "LaserJet".into(),
            serial_number: "CN-42".into(),
            color: false,
            duplex: false,
        };
        printer.fill_serial_number(7002);
        assert!(matches!(&printer, Characteristics::Printer { serial_number, .. } if serial_number == "CN-42"));

        let mut tv = Characteristics::Tv {
            model: "LG".into(),
            serial_number: String::new(),
            screen_size: 50,
        };
        tv.fill_serial_number(0);
        assert!(matches!(&tv, Characteristics::Tv { serial_number, .. } if serial_number.is_empty()));
    }

    #[test]
    fn unknown_kind_rejected() {
        let err = serde_json::from_str::<Characteristics>(r#"{"kind":"fax","model":"x"}"#);
        assert!(err.is_err());
    }
}
