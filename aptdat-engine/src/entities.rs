//! Entity records handed to the [`Sink`](crate::sink::Sink).
//!
//! Field layout mirrors the relational schema: one struct per table,
//! optional columns as `Option`. All identifiers are assigned by the
//! session before a record is emitted; child records always carry the
//! id of their parent airport.

use crate::geo::{Pos, Rect};

/// Per-source-file audit record of every airport identifier seen,
/// including duplicates and filtered-out ones.
#[derive(Debug, Clone, Default)]
pub struct AirportFileRecord {
    pub id: i64,
    pub file_id: i64,
    pub ident: String,
}

/// The airport aggregate row, finalized and emitted once per block.
#[derive(Debug, Clone, Default)]
pub struct AirportRecord {
    pub id: i64,
    pub file_id: i64,
    pub ident: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub region: String,

    pub is_closed: bool,
    pub is_military: bool,
    pub is_addon: bool,
    pub is_3d: bool,
    pub has_avgas: bool,
    pub has_jetfuel: bool,
    pub has_tower_object: bool,

    pub tower_frequency: Option<i32>,
    pub atis_frequency: Option<i32>,
    pub awos_frequency: Option<i32>,
    pub asos_frequency: Option<i32>,
    pub unicom_frequency: Option<i32>,

    pub tower_pos: Option<Pos>,
    pub tower_altitude: Option<f64>,

    pub num_com: i32,
    pub num_start: i32,
    pub num_apron: i32,
    pub num_taxi_path: i32,
    pub num_helipad: i32,
    pub num_runway_end_vasi: i32,
    pub num_runway_end_als: i32,
    pub num_runways: i32,
    pub num_runway_hard: i32,
    pub num_runway_soft: i32,
    pub num_runway_water: i32,
    pub num_runway_light: i32,
    pub num_parking: i32,
    pub num_parking_gate: i32,
    pub num_parking_ga_ramp: i32,
    pub num_parking_cargo: i32,
    pub num_parking_mil_cargo: i32,
    pub num_parking_mil_combat: i32,

    pub longest_runway_length: f64,
    pub longest_runway_width: f64,
    pub longest_runway_heading: f64,
    pub longest_runway_surface: String,
    pub largest_parking_gate: String,
    pub largest_parking_ramp: String,

    pub rating: i32,
    pub rect: Option<Rect>,
    pub pos: Option<Pos>,
    pub mag_var: f64,
    pub altitude: f64,

    pub scenery_local_path: String,
    pub file_name: String,
}

/// A runway with references to its two end records.
#[derive(Debug, Clone, Default)]
pub struct RunwayRecord {
    pub id: i64,
    pub airport_id: i64,
    pub primary_end_id: i64,
    pub secondary_end_id: i64,
    pub surface: &'static str,
    pub shoulder: Option<&'static str>,
    pub length: f64,
    pub width: f64,
    pub heading: f64,
    pub marking_flags: u32,
    pub edge_light: Option<&'static str>,
    pub center_light: Option<&'static str>,
    pub primary_pos: Pos,
    pub secondary_pos: Pos,
    pub altitude: f64,
    pub pos: Pos,
}

/// Primary or secondary end of a runway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunwayEndType {
    Primary,
    Secondary,
}

impl RunwayEndType {
    pub fn to_db(self) -> &'static str {
        match self {
            RunwayEndType::Primary => "P",
            RunwayEndType::Secondary => "S",
        }
    }
}

impl Default for RunwayEndType {
    fn default() -> Self {
        RunwayEndType::Primary
    }
}

/// One named runway threshold. Collected per airport and emitted as a
/// batch at finalize so VASI rows can still amend them.
#[derive(Debug, Clone, Default)]
pub struct RunwayEndRecord {
    pub id: i64,
    pub name: String,
    pub end_type: RunwayEndType,
    pub offset_threshold: f64,
    pub blast_pad: f64,
    pub als: Option<&'static str>,
    pub has_reils: bool,
    pub has_touchdown_lights: bool,
    pub has_closed_markings: bool,
    pub vasi_type: Option<&'static str>,
    pub vasi_pitch: f64,
    pub right_vasi_type: Option<&'static str>,
    pub right_vasi_pitch: f64,
    pub heading: f64,
    pub pos: Pos,
}

/// A start position: either a runway threshold or a helipad.
#[derive(Debug, Clone, Default)]
pub struct StartRecord {
    pub id: i64,
    pub airport_id: i64,
    pub runway_end_id: Option<i64>,
    pub number: Option<i32>,
    pub runway_name: String,
    pub start_type: &'static str,
    pub altitude: f64,
    pub heading: f64,
    pub pos: Pos,
}

/// A parking stand or ground start location.
#[derive(Debug, Clone, Default)]
pub struct ParkingRecord {
    pub id: i64,
    pub airport_id: i64,
    pub parking_type: String,
    pub name: String,
    pub airline_codes: Option<String>,
    pub number: i32,
    pub radius: f64,
    pub heading: f64,
    pub has_jetway: bool,
    pub pos: Pos,
}

/// A communication frequency. The value is stored times ten.
#[derive(Debug, Clone, Default)]
pub struct ComRecord {
    pub id: i64,
    pub airport_id: i64,
    pub com_type: &'static str,
    pub frequency: i32,
    pub name: String,
}

/// A helipad, paired 1:1 with a synthetic start position.
#[derive(Debug, Clone, Default)]
pub struct HelipadRecord {
    pub id: i64,
    pub airport_id: i64,
    pub start_id: i64,
    pub surface: &'static str,
    pub length: f64,
    pub width: f64,
    pub heading: f64,
    pub is_closed: bool,
    pub altitude: f64,
    pub pos: Pos,
}

/// An apron: the flushed pavement polygon plus its surface.
#[derive(Debug, Clone, Default)]
pub struct ApronRecord {
    pub id: i64,
    pub airport_id: i64,
    pub surface: &'static str,
    pub is_draw_surface: bool,
    pub is_draw_detail: bool,
    pub geometry: String,
}

/// A taxiway path between two taxi network nodes.
#[derive(Debug, Clone, Default)]
pub struct TaxiPathRecord {
    pub id: i64,
    pub airport_id: i64,
    pub path_type: &'static str,
    pub name: String,
    pub width: f64,
    pub start_pos: Option<Pos>,
    pub end_pos: Option<Pos>,
}
