//! Row codes and enumerated field values of the apt.dat format.
//!
//! Every integer enumeration coming in from the file is decoded through
//! a total classifier: unknown values map to a dedicated variant and are
//! never an error.

/// Semantic kind of one apt.dat row, classified from its leading
/// integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowCode {
    LandAirportHeader,
    SeaplaneBaseHeader,
    HeliportHeader,
    LandRunway,
    WaterRunway,
    Helipad,
    PavementHeader,
    Node,
    NodeAndControlPoint,
    NodeClose,
    NodeAndControlPointClose,
    AirportViewpoint,
    AeroplaneStartupLocation,
    LightingObject,
    StartupLocation,
    RampStartMetadata,
    MetadataRecords,
    TaxiNetworkNode,
    TaxiNetworkEdge,
    TruckParkingLocation,
    TruckDestinationLocation,
    ComWeather,
    ComUnicom,
    ComClearance,
    ComGround,
    ComTower,
    ComApproach,
    ComDeparture,
    /// Recognized codes this engine deliberately skips (linear features,
    /// boundaries, beacons, windsocks, signs, traffic flow, ...).
    Ignored,
    /// Anything else, including blank rows.
    Unknown,
}

impl RowCode {
    /// Total classification, never fails.
    pub fn from_code(code: i32) -> RowCode {
        use RowCode::*;
        match code {
            1 => LandAirportHeader,
            16 => SeaplaneBaseHeader,
            17 => HeliportHeader,
            100 => LandRunway,
            101 => WaterRunway,
            102 => Helipad,
            110 => PavementHeader,
            111 => Node,
            112 => NodeAndControlPoint,
            113 => NodeClose,
            114 => NodeAndControlPointClose,
            14 => AirportViewpoint,
            15 => AeroplaneStartupLocation,
            21 => LightingObject,
            1300 => StartupLocation,
            1301 => RampStartMetadata,
            1302 => MetadataRecords,
            1201 => TaxiNetworkNode,
            1202 => TaxiNetworkEdge,
            1400 => TruckParkingLocation,
            1401 => TruckDestinationLocation,
            50 => ComWeather,
            51 => ComUnicom,
            52 => ComClearance,
            53 => ComGround,
            54 => ComTower,
            55 => ComApproach,
            56 => ComDeparture,
            // Strings, boundaries, beacons, windsocks, signs, flow rules
            // and the taxi network header carry nothing we store.
            115 | 116 | 120 | 130 | 18 | 19 | 20 | 1000..=1004 | 1100 | 1101 | 1200 | 1204 => {
                Ignored
            }
            _ => Unknown,
        }
    }

    /// Header row opening a new airport block.
    pub fn is_airport_header(self) -> bool {
        matches!(
            self,
            RowCode::LandAirportHeader | RowCode::SeaplaneBaseHeader | RowCode::HeliportHeader
        )
    }

    /// Rows that continue an in-progress pavement polygon. Any other
    /// row flushes it.
    pub fn continues_pavement(self) -> bool {
        matches!(
            self,
            RowCode::PavementHeader
                | RowCode::Node
                | RowCode::NodeAndControlPoint
                | RowCode::NodeClose
                | RowCode::NodeAndControlPointClose
        )
    }

    /// Node rows carrying a bezier control point.
    pub fn has_control_point(self) -> bool {
        matches!(
            self,
            RowCode::NodeAndControlPoint | RowCode::NodeAndControlPointClose
        )
    }

    /// Node rows closing the current ring.
    pub fn closes_ring(self) -> bool {
        matches!(self, RowCode::NodeClose | RowCode::NodeAndControlPointClose)
    }
}

/// Runway, helipad and pavement surface material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Unknown,
    Asphalt,
    Concrete,
    TurfOrGrass,
    Dirt,
    Gravel,
    DryLakebed,
    Water,
    SnowOrIce,
    Transparent,
}

impl Surface {
    pub fn from_code(code: i32) -> Surface {
        match code {
            1 => Surface::Asphalt,
            2 => Surface::Concrete,
            3 => Surface::TurfOrGrass,
            4 => Surface::Dirt,
            5 => Surface::Gravel,
            12 => Surface::DryLakebed,
            13 => Surface::Water,
            14 => Surface::SnowOrIce,
            15 => Surface::Transparent,
            _ => Surface::Unknown,
        }
    }

    /// Database surface code.
    pub fn to_db(self) -> &'static str {
        match self {
            Surface::Unknown => "UNKNOWN",
            Surface::Transparent => "TR",
            Surface::Asphalt => "A",
            Surface::Concrete => "C",
            Surface::TurfOrGrass => "G",
            Surface::DryLakebed | Surface::Dirt => "D",
            Surface::Gravel => "GR",
            Surface::Water => "W",
            Surface::SnowOrIce => "SN",
        }
    }

    pub fn is_hard(self) -> bool {
        matches!(
            self,
            Surface::Unknown | Surface::Transparent | Surface::Asphalt | Surface::Concrete
        )
    }

    pub fn is_soft(self) -> bool {
        matches!(
            self,
            Surface::TurfOrGrass
                | Surface::DryLakebed
                | Surface::Dirt
                | Surface::Gravel
                | Surface::SnowOrIce
        )
    }

    pub fn is_water(self) -> bool {
        self == Surface::Water
    }
}

/// Runway marking flag bits as stored in the `marking_flags` column.
pub mod marking_flags {
    pub const EDGES: u32 = 1 << 0;
    pub const THRESHOLD: u32 = 1 << 1;
    pub const FIXED_DISTANCE: u32 = 1 << 2;
    pub const TOUCHDOWN: u32 = 1 << 3;
    pub const DASHES: u32 = 1 << 4;
    pub const IDENT: u32 = 1 << 5;
    pub const PRECISION: u32 = 1 << 6;
    pub const EDGE_PAVEMENT: u32 = 1 << 7;
    pub const ALTERNATE_THRESHOLD: u32 = 1 << 13;
    pub const ALTERNATE_FIXED_DISTANCE: u32 = 1 << 14;
    pub const ALTERNATE_TOUCHDOWN: u32 = 1 << 15;
    pub const ALTERNATE_PRECISION: u32 = 1 << 21;
}

/// Runway surface marking style per end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marking {
    NoMarking,
    Visual,
    NonPrecision,
    Precision,
    UkNonPrecision,
    UkPrecision,
}

impl Marking {
    pub fn from_code(code: i32) -> Marking {
        match code {
            1 => Marking::Visual,
            2 => Marking::NonPrecision,
            3 => Marking::Precision,
            4 => Marking::UkNonPrecision,
            5 => Marking::UkPrecision,
            _ => Marking::NoMarking,
        }
    }

    /// Decode the marking style into the flag set stored in the
    /// database.
    pub fn flags(self) -> u32 {
        use marking_flags::*;
        match self {
            Marking::NoMarking => 0,
            Marking::Visual => EDGES | DASHES | IDENT,
            Marking::NonPrecision => {
                EDGES | THRESHOLD | FIXED_DISTANCE | TOUCHDOWN | DASHES | IDENT | EDGE_PAVEMENT
            }
            Marking::Precision => {
                EDGES
                    | THRESHOLD
                    | FIXED_DISTANCE
                    | TOUCHDOWN
                    | DASHES
                    | IDENT
                    | PRECISION
                    | EDGE_PAVEMENT
            }
            Marking::UkNonPrecision => {
                EDGES
                    | ALTERNATE_THRESHOLD
                    | ALTERNATE_FIXED_DISTANCE
                    | ALTERNATE_TOUCHDOWN
                    | DASHES
                    | IDENT
                    | EDGE_PAVEMENT
            }
            Marking::UkPrecision => {
                EDGES
                    | ALTERNATE_THRESHOLD
                    | ALTERNATE_FIXED_DISTANCE
                    | ALTERNATE_TOUCHDOWN
                    | DASHES
                    | IDENT
                    | ALTERNATE_PRECISION
                    | EDGE_PAVEMENT
            }
        }
    }
}

/// Approach light system at a runway end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApproachLight {
    NoAls,
    AlsfI,
    AlsfII,
    Calvert,
    CalvertIls,
    Ssalr,
    Ssalf,
    Sals,
    Malsr,
    Malsf,
    Mals,
    Odals,
    Rail,
}

impl ApproachLight {
    pub fn from_code(code: i32) -> ApproachLight {
        match code {
            1 => ApproachLight::AlsfI,
            2 => ApproachLight::AlsfII,
            3 => ApproachLight::Calvert,
            4 => ApproachLight::CalvertIls,
            5 => ApproachLight::Ssalr,
            6 => ApproachLight::Ssalf,
            7 => ApproachLight::Sals,
            8 => ApproachLight::Malsr,
            9 => ApproachLight::Malsf,
            10 => ApproachLight::Mals,
            11 => ApproachLight::Odals,
            12 => ApproachLight::Rail,
            _ => ApproachLight::NoAls,
        }
    }

    pub fn to_db(self) -> Option<&'static str> {
        match self {
            ApproachLight::NoAls => None,
            ApproachLight::AlsfI => Some("ALSF1"),
            ApproachLight::AlsfII => Some("ALSF2"),
            ApproachLight::Calvert => Some("CALVERT"),
            ApproachLight::CalvertIls => Some("CALVERT2"),
            ApproachLight::Ssalr => Some("SSALR"),
            ApproachLight::Ssalf => Some("SSALF"),
            ApproachLight::Sals => Some("SALS"),
            ApproachLight::Malsr => Some("MALSR"),
            ApproachLight::Malsf => Some("MALSF"),
            ApproachLight::Mals => Some("MALS"),
            ApproachLight::Odals => Some("ODALS"),
            ApproachLight::Rail => Some("RAIL"),
        }
    }
}

/// Visual approach slope indicator type from a lighting-object row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApproachIndicator {
    NoIndicator,
    Vasi,
    Papi4Left,
    Papi4Right,
    SpaceShuttlePapi,
    TriColorVasi,
    RunwayGuard,
}

impl ApproachIndicator {
    pub fn from_code(code: i32) -> ApproachIndicator {
        match code {
            1 => ApproachIndicator::Vasi,
            2 => ApproachIndicator::Papi4Left,
            3 => ApproachIndicator::Papi4Right,
            4 => ApproachIndicator::SpaceShuttlePapi,
            5 => ApproachIndicator::TriColorVasi,
            6 => ApproachIndicator::RunwayGuard,
            _ => ApproachIndicator::NoIndicator,
        }
    }

    pub fn to_db(self) -> Option<&'static str> {
        match self {
            ApproachIndicator::NoIndicator => None,
            ApproachIndicator::Vasi => Some("VASI22"),
            ApproachIndicator::Papi4Left
            | ApproachIndicator::Papi4Right
            | ApproachIndicator::SpaceShuttlePapi => Some("PAPI4"),
            ApproachIndicator::TriColorVasi => Some("TRICOLOR"),
            ApproachIndicator::RunwayGuard => Some("GUARD"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifier_is_total() {
        assert_eq!(RowCode::from_code(1), RowCode::LandAirportHeader);
        assert_eq!(RowCode::from_code(100), RowCode::LandRunway);
        assert_eq!(RowCode::from_code(1302), RowCode::MetadataRecords);
        assert_eq!(RowCode::from_code(19), RowCode::Ignored);
        assert_eq!(RowCode::from_code(1003), RowCode::Ignored);
        assert_eq!(RowCode::from_code(-7), RowCode::Unknown);
        assert_eq!(RowCode::from_code(424242), RowCode::Unknown);
    }

    #[test]
    fn pavement_continuation_rows() {
        assert!(RowCode::from_code(110).continues_pavement());
        assert!(RowCode::from_code(113).continues_pavement());
        assert!(!RowCode::from_code(100).continues_pavement());
        assert!(RowCode::from_code(114).has_control_point());
        assert!(RowCode::from_code(114).closes_ring());
        assert!(!RowCode::from_code(111).closes_ring());
    }

    #[test]
    fn surface_buckets() {
        assert!(Surface::from_code(1).is_hard());
        assert!(Surface::from_code(2).is_hard());
        assert!(Surface::from_code(15).is_hard());
        assert!(Surface::from_code(0).is_hard());
        assert!(Surface::from_code(3).is_soft());
        assert!(Surface::from_code(12).is_soft());
        assert!(Surface::from_code(14).is_soft());
        assert!(Surface::from_code(13).is_water());
        assert!(!Surface::from_code(13).is_hard());
        assert_eq!(Surface::from_code(5).to_db(), "GR");
        assert_eq!(Surface::from_code(4).to_db(), "D");
        assert_eq!(Surface::from_code(12).to_db(), "D");
    }

    #[test]
    fn marking_flag_sets() {
        use marking_flags::*;
        assert_eq!(Marking::from_code(0).flags(), 0);
        assert_eq!(Marking::from_code(1).flags(), EDGES | DASHES | IDENT);
        assert_ne!(Marking::from_code(3).flags() & PRECISION, 0);
        assert_eq!(Marking::from_code(2).flags() & PRECISION, 0);
        assert_ne!(Marking::from_code(5).flags() & ALTERNATE_PRECISION, 0);
        // Out of range decodes as no marking
        assert_eq!(Marking::from_code(77).flags(), 0);
    }

    #[test]
    fn approach_light_strings() {
        assert_eq!(ApproachLight::from_code(0).to_db(), None);
        assert_eq!(ApproachLight::from_code(1).to_db(), Some("ALSF1"));
        assert_eq!(ApproachLight::from_code(8).to_db(), Some("MALSR"));
        assert_eq!(ApproachLight::from_code(99).to_db(), None);
    }

    #[test]
    fn approach_indicator_strings() {
        assert_eq!(ApproachIndicator::from_code(0).to_db(), None);
        assert_eq!(ApproachIndicator::from_code(2).to_db(), Some("PAPI4"));
        assert_eq!(ApproachIndicator::from_code(3).to_db(), Some("PAPI4"));
        assert_eq!(ApproachIndicator::from_code(5).to_db(), Some("TRICOLOR"));
    }
}
