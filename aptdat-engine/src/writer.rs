//! The airport session: a stateful interpreter for one stream of
//! apt.dat rows.
//!
//! Rows arrive strictly in file order. An airport header row opens a
//! block, every following row mutates the block's accumulators, and the
//! next header (or end of input) finalizes it: aggregate counts, the
//! bounding rectangle fallback chain and the facility rating are
//! resolved, the airport row and the collected runway-end batch are
//! flushed to the sink, and all state is reset.
//!
//! Errors in the data never abort the stream. Unexpected states and
//! failed lookups are logged and processing continues with defaults;
//! duplicate or filtered-out airport identifiers silently switch the
//! session into an ignoring state until the next header.

use std::cmp::Ordering;
use std::collections::HashMap;

use anyhow::Result;
use tracing::{debug, warn};

use crate::codes::{ApproachIndicator, ApproachLight, Marking, RowCode, Surface};
use crate::entities::{
    AirportFileRecord, AirportRecord, ApronRecord, ComRecord, HelipadRecord, ParkingRecord,
    RunwayEndRecord, RunwayEndType, RunwayRecord, StartRecord, TaxiPathRecord,
};
use crate::fields::Fields;
use crate::geo::{
    meter_to_feet, opposed_course, Pos, Rect, EPSILON_100M_DEG, MIN_RECT_MARGIN_DEG,
};
use crate::index::AirportIndex;
use crate::options::{FileContext, IngestOptions};
use crate::pavement::{Pavement, PavementNode};
use crate::sink::{MagVarSource, Sink};
use crate::util;

// Placeholder taxiway names that carry no information.
const GARBAGE_TAXI_NAMES: &[&str] = &[
    "*",
    "**",
    "+",
    "-",
    ".",
    "TAXIWAY",
    "TAXI_TO_RAMP",
    "TAXI_RAMP",
    "TAXY_RAMP",
    "UNNAMED",
    "TWY",
    "TAXI",
];

// VASI rows may match a runway end by heading when the name is missing.
const VASI_HEADING_TOLERANCE_DEG: f64 = 10.0;

/// Rank two gate type codes. "GH" outranks everything, "GS" is
/// outranked by everything, all remaining codes are unordered.
pub fn compare_gate(gate1: &str, gate2: &str) -> Ordering {
    if gate1 != gate2 {
        if gate1 == "GH" {
            return Ordering::Greater;
        }
        if gate2 == "GH" {
            return Ordering::Less;
        }
        if gate1 == "GS" {
            return Ordering::Less;
        }
        if gate2 == "GS" {
            return Ordering::Greater;
        }
    }
    Ordering::Equal
}

/// Rank two GA ramp type codes, "RGAL" highest and "RGAS" lowest.
pub fn compare_ramp(ramp1: &str, ramp2: &str) -> Ordering {
    if ramp1 != ramp2 {
        if ramp1 == "RGAL" {
            return Ordering::Greater;
        }
        if ramp2 == "RGAL" {
            return Ordering::Less;
        }
        if ramp1 == "RGAS" {
            return Ordering::Less;
        }
        if ramp2 == "RGAS" {
            return Ordering::Greater;
        }
    }
    Ordering::Equal
}

/// Stand radius and size letter for an ICAO width code.
pub fn parking_size_for_width_code(code: &str) -> (f64, &'static str) {
    match code {
        "A" => (25.0, "S"),
        "B" => (40.0, "S"),
        "C" => (60.0, "M"),
        "D" => (80.0, "M"),
        "E" => (100.0, "H"),
        "F" => (130.0, "H"),
        _ => (10.0, "S"),
    }
}

/// Per-airport counters, reset between blocks.
#[derive(Debug, Default)]
struct Counts {
    runway: i32,
    hard: i32,
    soft: i32,
    water: i32,
    light: i32,
    helipad: i32,
    com: i32,
    start: i32,
    vasi: i32,
    als: i32,
    apron: i32,
    taxi_path: i32,
    parking: i32,
    parking_gate: i32,
    parking_ga_ramp: i32,
    parking_cargo: i32,
    parking_mil_cargo: i32,
    parking_mil_combat: i32,
}

/// Summary of the longest runway seen so far in the current block.
#[derive(Debug, Default)]
struct LongestRunway {
    length: f64,
    width: f64,
    heading: f64,
    surface: &'static str,
    center: Option<Pos>,
}

/// The top-level state machine. Owns all per-airport mutable state;
/// exactly one airport block is in flight at any time.
pub struct AirportWriter<'a, S: Sink> {
    sink: &'a mut S,
    index: &'a mut AirportIndex,
    options: &'a IngestOptions,
    mag_var: &'a dyn MagVarSource,

    // Session-wide id sequences
    next_airport_id: i64,
    next_airport_file_id: i64,
    next_runway_end_id: i64,
    next_start_id: i64,
    next_parking_id: i64,
    next_com_id: i64,
    next_helipad_id: i64,
    next_apron_id: i64,
    next_taxi_path_id: i64,
    airports_written: u64,

    // Block state: neither flag set means idle
    writing_airport: bool,
    ignoring_airport: bool,

    // Per-airport accumulators
    airport: AirportRecord,
    airport_ident: String,
    airport_altitude: f64,
    airport_closed: bool,
    rect: Option<Rect>,
    datum_lat: Option<f64>,
    datum_lon: Option<f64>,
    counts: Counts,
    longest: LongestRunway,
    runway_ends: Vec<RunwayEndRecord>,
    taxi_nodes: HashMap<i32, Pos>,
    largest_parking_gate: String,
    largest_parking_ramp: String,
    has_tower: bool,
    helipad_start_number: i32,

    // In-progress pavement polygon
    pavement: Pavement,
    pavement_surface: &'static str,
    collecting_boundary: bool,
    collecting_holes: bool,
    starting_new_hole: bool,

    // In-progress parking stand, waiting for a possible metadata row
    parking: Option<ParkingRecord>,
}

impl<'a, S: Sink> AirportWriter<'a, S> {
    pub fn new(
        sink: &'a mut S,
        index: &'a mut AirportIndex,
        options: &'a IngestOptions,
        mag_var: &'a dyn MagVarSource,
    ) -> Self {
        Self {
            sink,
            index,
            options,
            mag_var,
            next_airport_id: 1,
            next_airport_file_id: 1,
            next_runway_end_id: 1,
            next_start_id: 1,
            next_parking_id: 1,
            next_com_id: 1,
            next_helipad_id: 1,
            next_apron_id: 1,
            next_taxi_path_id: 1,
            airports_written: 0,
            writing_airport: false,
            ignoring_airport: false,
            airport: AirportRecord::default(),
            airport_ident: String::new(),
            airport_altitude: 0.0,
            airport_closed: false,
            rect: None,
            datum_lat: None,
            datum_lon: None,
            counts: Counts::default(),
            longest: LongestRunway {
                surface: "UNKNOWN",
                ..Default::default()
            },
            runway_ends: Vec::new(),
            taxi_nodes: HashMap::new(),
            largest_parking_gate: String::new(),
            largest_parking_ramp: String::new(),
            has_tower: false,
            helipad_start_number: 0,
            pavement: Pavement::new(),
            pavement_surface: "UNKNOWN",
            collecting_boundary: false,
            collecting_holes: false,
            starting_new_hole: false,
            parking: None,
        }
    }

    /// Number of airport records flushed so far.
    pub fn airports_written(&self) -> u64 {
        self.airports_written
    }

    /// Dispatch one classified row.
    pub fn write(&mut self, fields: &Fields<'_>, ctx: &FileContext) -> Result<()> {
        let row = RowCode::from_code(fields.num::<i32>(0));

        // Any row that does not continue the in-progress pavement or
        // parking stand flushes it first.
        if !row.continues_pavement() {
            self.finish_pavement(ctx)?;
        }
        if row != RowCode::RampStartMetadata {
            self.finish_startup_location()?;
        }

        match row {
            RowCode::LandAirportHeader | RowCode::SeaplaneBaseHeader | RowCode::HeliportHeader => {
                self.finish_airport(ctx)?;
                self.bind_airport(fields, ctx)?;
            }

            RowCode::LandRunway | RowCode::WaterRunway => self.bind_runway(fields, row, ctx)?,

            RowCode::Helipad => self.write_helipad(fields, ctx)?,

            RowCode::PavementHeader => {
                self.finish_pavement(ctx)?;
                self.bind_pavement(fields, ctx);
            }

            RowCode::Node
            | RowCode::NodeAndControlPoint
            | RowCode::NodeClose
            | RowCode::NodeAndControlPointClose => self.bind_pavement_node(fields, row, ctx),

            RowCode::AirportViewpoint => self.bind_viewpoint(fields, ctx),

            RowCode::AeroplaneStartupLocation => self.write_startup(fields, ctx)?,

            RowCode::LightingObject => self.bind_vasi(fields, ctx),

            RowCode::StartupLocation => self.write_startup_location(fields, ctx),

            RowCode::RampStartMetadata => self.bind_startup_metadata(fields, ctx),

            RowCode::TaxiNetworkNode => self.bind_taxi_node(fields, ctx),
            RowCode::TaxiNetworkEdge => self.bind_taxi_edge(fields, ctx)?,

            RowCode::MetadataRecords => self.bind_metadata(fields, ctx),

            RowCode::TruckParkingLocation | RowCode::TruckDestinationLocation => {
                self.bind_fuel(fields, ctx)
            }

            RowCode::ComWeather
            | RowCode::ComUnicom
            | RowCode::ComClearance
            | RowCode::ComGround
            | RowCode::ComTower
            | RowCode::ComApproach
            | RowCode::ComDeparture => self.write_com(fields, row, ctx)?,

            RowCode::Ignored | RowCode::Unknown => {}
        }
        Ok(())
    }

    /// Flush everything at end of input. The finalize here is the only
    /// commit point for a partially-read airport.
    pub fn finish(&mut self, ctx: &FileContext) -> Result<()> {
        self.finish_pavement(ctx)?;
        self.finish_startup_location()?;
        self.finish_airport(ctx)
    }

    fn check_writing(&self, what: &str, ctx: &FileContext) {
        if !self.writing_airport {
            warn!(
                "{} invalid airport state in {}",
                ctx.message_prefix(),
                what
            );
        }
    }

    fn extend_rect(&mut self, pos: Pos) {
        match &mut self.rect {
            Some(rect) => rect.extend(pos),
            None => self.rect = Some(Rect::from_pos(pos)),
        }
    }

    // =====================================================================
    // Airport header and finalize

    fn bind_airport(&mut self, fields: &Fields<'_>, ctx: &FileContext) -> Result<()> {
        if self.writing_airport {
            warn!(
                "{} still writing previous airport at new header",
                ctx.message_prefix()
            );
        }
        if self.ignoring_airport {
            warn!(
                "{} still ignoring previous airport at new header",
                ctx.message_prefix()
            );
        }

        let airport_id = self.next_airport_id;
        self.next_airport_id += 1;
        let ident = fields.at(4).to_string();

        // Audit record for every identifier seen, duplicates included
        self.write_airport_file(&ident, ctx)?;

        if !self.index.add_airport(&ident, airport_id)
            || !self.options.is_included_ident(&ident)
        {
            // Already read before or filtered out - skip the whole block
            self.ignoring_airport = true;
            return Ok(());
        }

        self.writing_airport = true;
        self.airport_ident = ident.clone();
        self.airport_altitude = fields.num::<f64>(1);

        let raw_name = fields.tail(5);
        self.airport_closed = util::is_name_closed(&raw_name);
        let name = util::strip_name_indicators(&raw_name);
        // Military check runs before capitalization normalizes case
        let is_military = util::is_name_military(&name);
        let name = util::capitalize_airport_name(&name);

        let airport = &mut self.airport;
        airport.id = airport_id;
        airport.file_id = ctx.file_id;
        airport.ident = ident;
        airport.name = name;
        airport.is_closed = self.airport_closed;
        airport.is_military = is_military;
        airport.is_addon = ctx.is_addon;
        airport.altitude = self.airport_altitude;
        airport.scenery_local_path = ctx.local_path.clone();
        airport.file_name = ctx.file_name.clone();
        Ok(())
    }

    fn write_airport_file(&mut self, ident: &str, ctx: &FileContext) -> Result<()> {
        let id = self.next_airport_file_id;
        self.next_airport_file_id += 1;
        self.sink.airport_file(&AirportFileRecord {
            id,
            file_id: ctx.file_id,
            ident: ident.to_string(),
        })
    }

    fn finish_airport(&mut self, ctx: &FileContext) -> Result<()> {
        if self.writing_airport && !self.ignoring_airport {
            let counts = &self.counts;
            let airport = &mut self.airport;

            airport.num_runways = counts.soft + counts.water + counts.hard;
            airport.num_runway_hard = counts.hard;
            airport.num_runway_soft = counts.soft;
            airport.num_runway_water = counts.water;
            airport.num_runway_light = counts.light;
            airport.num_helipad = counts.helipad;
            airport.num_com = counts.com;
            airport.num_start = counts.start;
            airport.num_runway_end_vasi = counts.vasi;
            airport.num_runway_end_als = counts.als;
            airport.num_apron = counts.apron;
            airport.num_taxi_path = counts.taxi_path;
            airport.num_parking = counts.parking;
            airport.num_parking_gate = counts.parking_gate;
            airport.num_parking_ga_ramp = counts.parking_ga_ramp;
            airport.num_parking_cargo = counts.parking_cargo;
            airport.num_parking_mil_cargo = counts.parking_mil_cargo;
            airport.num_parking_mil_combat = counts.parking_mil_combat;

            airport.has_tower_object = self.has_tower;
            airport.is_3d = ctx.is_3d;
            airport.rating = util::airport_rating(
                ctx.is_addon,
                ctx.is_3d,
                self.has_tower,
                counts.taxi_path,
                counts.parking,
                counts.apron,
            );

            airport.longest_runway_length = self.longest.length;
            airport.longest_runway_width = self.longest.width;
            airport.longest_runway_heading = self.longest.heading;
            airport.longest_runway_surface = self.longest.surface.to_string();

            // Resolve the bounding rectangle and representative
            // position. The optional datum is only trusted when it lies
            // in or near the accumulated rectangle.
            let datum = match (self.datum_lat, self.datum_lon) {
                (Some(lat), Some(lon)) => Some(Pos::new(lon, lat)),
                _ => None,
            };
            let mut airport_pos: Option<Pos> = None;
            match self.rect {
                None => {
                    warn!(
                        "{} {} no bounding rectangle for airport found",
                        ctx.message_prefix(),
                        airport.ident
                    );
                    if let Some(datum) = datum {
                        self.rect = Some(Rect::from_pos(datum));
                        airport_pos = Some(datum);
                    } else if let Some(center) = self.longest.center {
                        self.rect = Some(Rect::from_pos(center));
                        airport_pos = Some(center);
                    } else {
                        warn!(
                            "{} {} could not determine bounding rectangle",
                            ctx.message_prefix(),
                            airport.ident
                        );
                    }
                }
                Some(rect) => {
                    if let Some(datum) = datum {
                        let mut test = rect;
                        test.inflate(EPSILON_100M_DEG, EPSILON_100M_DEG);
                        if test.contains(datum) {
                            airport_pos = Some(datum);
                        } else if counts.runway == 1 {
                            airport_pos = self.longest.center;
                        } else {
                            airport_pos = Some(rect.center());
                        }
                    }
                }
            }

            if let Some(rect) = &mut self.rect {
                if rect.is_point() {
                    rect.inflate(MIN_RECT_MARGIN_DEG, MIN_RECT_MARGIN_DEG);
                }
            }
            airport.rect = self.rect;

            let center = airport_pos.or_else(|| self.rect.map(|r| r.center()));
            airport.pos = center;
            if let Some(center) = center {
                airport.mag_var = self.mag_var.mag_var(center);
            }

            self.sink.airport(&self.airport)?;
            self.airports_written += 1;
            self.sink.runway_ends(&self.runway_ends)?;
        }

        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        self.airport = AirportRecord::default();
        self.airport_ident.clear();
        self.airport_altitude = 0.0;
        self.airport_closed = false;
        self.rect = None;
        self.datum_lat = None;
        self.datum_lon = None;
        self.counts = Counts::default();
        self.longest = LongestRunway {
            surface: "UNKNOWN",
            ..Default::default()
        };
        self.runway_ends.clear();
        self.taxi_nodes.clear();
        self.largest_parking_gate.clear();
        self.largest_parking_ramp.clear();
        self.has_tower = false;
        self.helipad_start_number = 0;
        self.pavement.clear();
        self.pavement_surface = "UNKNOWN";
        self.collecting_boundary = false;
        self.collecting_holes = false;
        self.starting_new_hole = false;
        self.parking = None;
        self.writing_airport = false;
        self.ignoring_airport = false;
    }

    // =====================================================================
    // Runways

    fn bind_runway(&mut self, fields: &Fields<'_>, row: RowCode, ctx: &FileContext) -> Result<()> {
        if self.ignoring_airport {
            return Ok(());
        }
        self.check_writing("runway", ctx);

        // Land and water rows lay out the same data at different
        // indexes.
        let (primary_pos, secondary_pos, primary_name, secondary_name, surface) = match row {
            RowCode::LandRunway => (
                Pos::new(fields.num(10), fields.num(9)),
                Pos::new(fields.num(19), fields.num(18)),
                fields.at(8).to_string(),
                fields.at(17).to_string(),
                Surface::from_code(fields.num(2)),
            ),
            RowCode::WaterRunway => (
                Pos::new(fields.num(5), fields.num(4)),
                Pos::new(fields.num(8), fields.num(7)),
                fields.at(3).to_string(),
                fields.at(6).to_string(),
                Surface::Water,
            ),
            _ => {
                warn!(
                    "{} invalid runway row kind {:?}",
                    ctx.message_prefix(),
                    row
                );
                (
                    Pos::default(),
                    Pos::default(),
                    String::new(),
                    String::new(),
                    Surface::Unknown,
                )
            }
        };

        let primary_end_id = self.next_runway_end_id;
        let secondary_end_id = self.next_runway_end_id + 1;
        self.next_runway_end_id += 2;
        self.index
            .add_runway_end(&self.airport_ident, &primary_name, primary_end_id);
        self.index
            .add_runway_end(&self.airport_ident, &secondary_name, secondary_end_id);

        let length = meter_to_feet(primary_pos.distance_meter_to(&secondary_pos));
        let width = meter_to_feet(fields.num::<f64>(1));
        let primary_heading = primary_pos.bearing_deg_to(&secondary_pos);
        let secondary_heading = opposed_course(primary_heading);
        let center = primary_pos.midpoint(&secondary_pos);
        self.extend_rect(primary_pos);
        self.extend_rect(secondary_pos);

        self.counts.runway += 1;
        if surface.is_hard() {
            self.counts.hard += 1;
        }
        if surface.is_soft() {
            self.counts.soft += 1;
        }
        if surface.is_water() {
            self.counts.water += 1;
        }

        if length > self.longest.length {
            self.longest = LongestRunway {
                length,
                width,
                heading: primary_heading,
                surface: surface.to_db(),
                center: Some(center),
            };
        }

        let mut runway = RunwayRecord {
            id: primary_end_id,
            airport_id: self.airport.id,
            primary_end_id,
            secondary_end_id,
            surface: surface.to_db(),
            shoulder: match fields.num::<i32>(3) {
                1 => Some(Surface::Asphalt.to_db()),
                2 => Some(Surface::Concrete.to_db()),
                _ => None,
            },
            length,
            width,
            heading: primary_heading,
            marking_flags: 0,
            edge_light: None,
            center_light: None,
            primary_pos,
            secondary_pos,
            altitude: self.airport_altitude,
            pos: center,
        };

        if row == RowCode::LandRunway {
            runway.marking_flags = Marking::from_code(fields.num(13)).flags()
                | Marking::from_code(fields.num(22)).flags();

            let edge_lights = fields.num::<i32>(6);
            runway.edge_light = match edge_lights {
                0 => None,
                1 => Some("L"),
                2 => Some("M"),
                3 => Some("H"),
                _ => {
                    warn!(
                        "{} invalid edge light value {}",
                        ctx.message_prefix(),
                        edge_lights
                    );
                    None
                }
            };
            // Center lights are either off or medium
            let center_lights = fields.num::<i32>(5);
            runway.center_light = (center_lights == 1).then_some("M");

            if edge_lights > 0 || center_lights > 0 {
                self.counts.light += 1;
            }
        }

        let primary = self.bind_runway_end(
            fields,
            row,
            RunwayEndType::Primary,
            primary_end_id,
            primary_name.clone(),
            primary_heading,
            primary_pos,
        );
        self.runway_ends.push(primary);
        let secondary = self.bind_runway_end(
            fields,
            row,
            RunwayEndType::Secondary,
            secondary_end_id,
            secondary_name.clone(),
            secondary_heading,
            secondary_pos,
        );
        self.runway_ends.push(secondary);

        self.sink.runway(&runway)?;

        self.write_runway_start(primary_end_id, &primary_name, primary_pos, primary_heading)?;
        self.write_runway_start(
            secondary_end_id,
            &secondary_name,
            secondary_pos,
            secondary_heading,
        )?;
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn bind_runway_end(
        &mut self,
        fields: &Fields<'_>,
        row: RowCode,
        end_type: RunwayEndType,
        id: i64,
        name: String,
        heading: f64,
        pos: Pos,
    ) -> RunwayEndRecord {
        let mut end = RunwayEndRecord {
            id,
            name,
            end_type,
            has_closed_markings: self.airport_closed,
            heading,
            pos,
            ..Default::default()
        };

        if row == RowCode::LandRunway {
            let base = match end_type {
                RunwayEndType::Primary => 11,
                RunwayEndType::Secondary => 20,
            };
            end.offset_threshold = meter_to_feet(fields.num(base));
            end.blast_pad = meter_to_feet(fields.num(base + 1));
            end.als = ApproachLight::from_code(fields.num(base + 3)).to_db();
            if end.als.is_some() {
                self.counts.als += 1;
            }
            end.has_touchdown_lights = fields.num::<i32>(base + 4) > 0;
            end.has_reils = fields.num::<i32>(base + 5) > 0;
        }
        // Water runways have no lighting, markings or thresholds

        end
    }

    fn write_runway_start(
        &mut self,
        runway_end_id: i64,
        name: &str,
        pos: Pos,
        heading: f64,
    ) -> Result<()> {
        self.counts.start += 1;
        let id = self.next_start_id;
        self.next_start_id += 1;
        self.sink.start(&StartRecord {
            id,
            airport_id: self.airport.id,
            runway_end_id: Some(runway_end_id),
            number: None,
            runway_name: name.to_string(),
            start_type: "R",
            altitude: self.airport_altitude,
            heading,
            pos,
        })
    }

    // =====================================================================
    // VASI/PAPI

    fn bind_vasi(&mut self, fields: &Fields<'_>, ctx: &FileContext) {
        if self.ignoring_airport {
            return;
        }
        self.check_writing("lighting object", ctx);

        let indicator = ApproachIndicator::from_code(fields.num(3));
        if matches!(
            indicator,
            ApproachIndicator::NoIndicator | ApproachIndicator::RunwayGuard
        ) {
            return;
        }

        let runway_name = fields.at(6);
        let orientation = fields.num::<f64>(4);

        // By name first; the field is missing in older files
        let mut best = if runway_name.is_empty() {
            None
        } else {
            self.runway_ends.iter().position(|e| e.name == runway_name)
        };

        if best.is_none() {
            let mut best_diff = f64::MAX;
            for (i, end) in self.runway_ends.iter().enumerate() {
                // Plain difference, does not catch wrap-around like 355 vs 5
                let diff = (end.heading - orientation).abs();
                if diff < VASI_HEADING_TOLERANCE_DEG && diff < best_diff {
                    best = Some(i);
                    best_diff = diff;
                }
            }
        }

        match best {
            Some(i) => {
                self.counts.vasi += 1;
                let end = &mut self.runway_ends[i];
                end.vasi_type = indicator.to_db();
                end.vasi_pitch = fields.num(5);
                // Only one side is modeled
                end.right_vasi_type = Some("UNKN");
                end.right_vasi_pitch = 0.0;
            }
            None => warn!(
                "{} no runway end {:?} for VASI with orientation {} found",
                ctx.message_prefix(),
                runway_name,
                orientation
            ),
        }
    }

    // =====================================================================
    // Viewpoint, com, fuel, metadata

    fn bind_viewpoint(&mut self, fields: &Fields<'_>, ctx: &FileContext) {
        if self.ignoring_airport {
            return;
        }
        self.check_writing("viewpoint", ctx);

        let pos = Pos::new(fields.num(2), fields.num(1));
        self.extend_rect(pos);
        self.airport.tower_pos = Some(pos);
        self.airport.tower_altitude = Some(self.airport_altitude + fields.num::<f64>(3));
        self.has_tower = true;
    }

    fn write_com(&mut self, fields: &Fields<'_>, row: RowCode, ctx: &FileContext) -> Result<()> {
        if self.ignoring_airport {
            return Ok(());
        }
        self.check_writing("com", ctx);

        self.counts.com += 1;
        let id = self.next_com_id;
        self.next_com_id += 1;

        let frequency = fields.num::<i32>(1) * 10;
        let name = fields.tail(2);
        let lower = name.to_lowercase();

        let com_type = match row {
            RowCode::ComWeather => {
                // The weather subtype is ambiguous, scan the name.
                // ATIS takes precedence over AWOS/ASOS mentions.
                if lower.contains("atis") {
                    self.airport.atis_frequency = Some(frequency);
                    "ATIS"
                } else if lower.contains("awos") {
                    self.airport.awos_frequency = Some(frequency);
                    "AWOS"
                } else if lower.contains("asos") {
                    self.airport.asos_frequency = Some(frequency);
                    "ASOS"
                } else {
                    self.airport.atis_frequency = Some(frequency);
                    "ATIS"
                }
            }
            RowCode::ComUnicom => {
                self.airport.unicom_frequency = Some(frequency);
                "UC"
            }
            RowCode::ComTower => {
                self.airport.tower_frequency = Some(frequency);
                "T"
            }
            RowCode::ComClearance => "C",
            RowCode::ComGround => "G",
            RowCode::ComApproach => "A",
            RowCode::ComDeparture => "D",
            _ => "NONE",
        };

        self.sink.com(&ComRecord {
            id,
            airport_id: self.airport.id,
            com_type,
            frequency,
            name,
        })
    }

    fn bind_fuel(&mut self, fields: &Fields<'_>, ctx: &FileContext) {
        if self.ignoring_airport {
            return;
        }
        self.check_writing("truck location", ctx);

        // Pipe-separated service list
        let services = fields.at(4);
        if services.contains("fuel_props") {
            self.airport.has_avgas = true;
        }
        if services.contains("fuel_liners") || services.contains("fuel_jets") {
            self.airport.has_jetfuel = true;
        }
    }

    fn bind_metadata(&mut self, fields: &Fields<'_>, ctx: &FileContext) {
        if self.ignoring_airport {
            return;
        }
        self.check_writing("metadata", ctx);

        let key = fields.at(1).to_lowercase();
        let value = fields.tail(2);

        if key == "city" {
            self.airport.city = value;
        } else if key == "country" {
            self.airport.country = value;
        } else if key.starts_with("region") && !value.is_empty() {
            // Documentation is unclear whether region_id or region_code
            self.airport.region = value;
        } else if key == "datum_lat" {
            let lat = value.parse::<f64>().unwrap_or(0.0);
            if lat.abs() > 1e-7 {
                self.datum_lat = Some(lat);
            }
        } else if key == "datum_lon" {
            let lon = value.parse::<f64>().unwrap_or(0.0);
            if lon.abs() > 1e-7 {
                self.datum_lon = Some(lon);
            }
        }
    }

    // =====================================================================
    // Helipads

    fn write_helipad(&mut self, fields: &Fields<'_>, ctx: &FileContext) -> Result<()> {
        if self.ignoring_airport {
            return Ok(());
        }
        self.check_writing("helipad", ctx);

        let pos = Pos::new(fields.num(3), fields.num(2));
        let heading = fields.num::<f64>(4);

        // Each helipad gets a numbered synthetic start position
        self.counts.start += 1;
        self.helipad_start_number += 1;
        let start_id = self.next_start_id;
        self.next_start_id += 1;
        self.sink.start(&StartRecord {
            id: start_id,
            airport_id: self.airport.id,
            runway_end_id: None,
            number: Some(self.helipad_start_number),
            runway_name: format!("{:02}", self.helipad_start_number),
            start_type: "H",
            altitude: self.airport_altitude,
            heading,
            pos,
        })?;

        self.counts.helipad += 1;
        let id = self.next_helipad_id;
        self.next_helipad_id += 1;
        self.extend_rect(pos);
        self.sink.helipad(&HelipadRecord {
            id,
            airport_id: self.airport.id,
            start_id,
            surface: Surface::from_code(fields.num(7)).to_db(),
            length: meter_to_feet(fields.num(5)),
            width: meter_to_feet(fields.num(6)),
            heading,
            is_closed: self.airport_closed,
            altitude: self.airport_altitude,
            pos,
        })
    }

    // =====================================================================
    // Pavement polygons

    fn bind_pavement(&mut self, fields: &Fields<'_>, ctx: &FileContext) {
        if self.ignoring_airport {
            return;
        }
        self.check_writing("pavement header", ctx);

        self.pavement.clear();
        self.pavement_surface = Surface::from_code(fields.num(1)).to_db();
        self.collecting_boundary = true;
        self.collecting_holes = false;
        self.starting_new_hole = false;
    }

    fn bind_pavement_node(&mut self, fields: &Fields<'_>, row: RowCode, ctx: &FileContext) {
        if self.ignoring_airport {
            return;
        }
        self.check_writing("pavement node", ctx);

        let pos = Pos::new(fields.num(2), fields.num(1));
        let control = row
            .has_control_point()
            .then(|| Pos::new(fields.num(4), fields.num(3)));
        self.extend_rect(pos);

        let node = PavementNode::new(pos, control);
        if self.collecting_boundary {
            self.pavement.add_boundary_node(node);
        } else if self.collecting_holes {
            self.pavement.add_hole_node(node, self.starting_new_hole);
        }
        self.starting_new_hole = false;

        if row.closes_ring() {
            if self.collecting_boundary {
                // Boundary is closed, everything after belongs to holes
                self.collecting_boundary = false;
                self.collecting_holes = true;
            }
            if self.collecting_holes {
                self.starting_new_hole = true;
            }
        }
    }

    fn finish_pavement(&mut self, ctx: &FileContext) -> Result<()> {
        if self.ignoring_airport {
            return Ok(());
        }
        if self.collecting_boundary || self.collecting_holes {
            self.check_writing("pavement flush", ctx);

            if !self.pavement.is_empty() {
                if self.pavement.has_degenerate_ring() {
                    debug!(
                        "{} degenerate pavement hole ring at {}",
                        ctx.message_prefix(),
                        self.airport_ident
                    );
                }
                self.counts.apron += 1;
                let id = self.next_apron_id;
                self.next_apron_id += 1;
                self.sink.apron(&ApronRecord {
                    id,
                    airport_id: self.airport.id,
                    surface: self.pavement_surface,
                    is_draw_surface: true,
                    is_draw_detail: true,
                    geometry: self.pavement.to_geometry(),
                })?;
            }
            self.pavement.clear();
            self.collecting_boundary = false;
            self.collecting_holes = false;
            self.starting_new_hole = false;
        }
        Ok(())
    }

    // =====================================================================
    // Parking stands

    fn write_startup_location(&mut self, fields: &Fields<'_>, ctx: &FileContext) {
        if self.ignoring_airport {
            return;
        }
        self.check_writing("startup location", ctx);

        let id = self.next_parking_id;
        self.next_parking_id += 1;
        self.counts.parking += 1;

        let pos = Pos::new(fields.num(2), fields.num(1));
        self.extend_rect(pos);

        let name = fields.tail(6);
        let lower = name.to_lowercase();

        let mut has_fuel = false;
        if lower.contains("avgas") || lower.contains("mogas") || lower.contains("gas-station") {
            has_fuel = true;
            self.airport.has_avgas = true;
        }
        if lower.contains("jetfuel") {
            has_fuel = true;
            self.airport.has_jetfuel = true;
        }
        if lower.contains("fuel") {
            has_fuel = true;
            self.airport.has_avgas = true;
            self.airport.has_jetfuel = true;
        }

        let parking_type = if has_fuel {
            "FUEL"
        } else {
            match fields.at(4) {
                "gate" => "G",
                "hangar" => "H",
                "tie-down" => "T",
                // "misc" and everything else stays untyped
                _ => "",
            }
        };

        self.parking = Some(ParkingRecord {
            id,
            airport_id: self.airport.id,
            parking_type: parking_type.to_string(),
            name,
            airline_codes: None,
            number: -1,
            radius: 50.0,
            heading: fields.num(3),
            has_jetway: false,
            pos,
        });
    }

    /// The legacy startup row: an untyped stand, flushed immediately
    /// since no metadata row can follow it.
    fn write_startup(&mut self, fields: &Fields<'_>, ctx: &FileContext) -> Result<()> {
        if self.ignoring_airport {
            return Ok(());
        }
        self.check_writing("startup", ctx);

        let id = self.next_parking_id;
        self.next_parking_id += 1;
        self.counts.parking += 1;

        let pos = Pos::new(fields.num(2), fields.num(1));
        self.extend_rect(pos);

        self.parking = Some(ParkingRecord {
            id,
            airport_id: self.airport.id,
            parking_type: String::new(),
            name: fields.tail(4),
            airline_codes: None,
            number: -1,
            radius: 50.0,
            heading: fields.num(3),
            has_jetway: false,
            pos,
        });
        self.finish_startup_location()
    }

    fn bind_startup_metadata(&mut self, fields: &Fields<'_>, ctx: &FileContext) {
        if self.ignoring_airport {
            return;
        }
        self.check_writing("ramp metadata", ctx);

        let Some(parking) = &mut self.parking else {
            warn!(
                "{} ramp metadata without open startup location",
                ctx.message_prefix()
            );
            return;
        };

        let is_fuel = parking.parking_type == "FUEL";
        if !is_fuel {
            // Operation type refines the ramp category
            match fields.at(2) {
                "general_aviation" => parking.parking_type = "RGA".to_string(),
                "cargo" => parking.parking_type = "RC".to_string(),
                "military" => parking.parking_type = "RM".to_string(),
                // "airline" and "none" keep the current type
                _ => {}
            }
        }

        if fields.len() > 3 {
            parking.airline_codes = Some(fields.at(3).to_uppercase());
        }

        let (radius, size_letter) = parking_size_for_width_code(fields.at(1));
        parking.radius = radius;

        if !is_fuel && (parking.parking_type == "G" || parking.parking_type == "RGA") {
            parking.parking_type.push_str(size_letter);
        }
    }

    fn finish_startup_location(&mut self) -> Result<()> {
        let Some(parking) = self.parking.take() else {
            return Ok(());
        };

        let parking_type = parking.parking_type.as_str();
        if parking_type.starts_with('G') {
            self.counts.parking_gate += 1;
            if self.largest_parking_gate.is_empty()
                || compare_gate(&self.largest_parking_gate, parking_type).is_lt()
            {
                self.largest_parking_gate = parking_type.to_string();
            }
        }
        if parking_type.starts_with("RGA") {
            self.counts.parking_ga_ramp += 1;
            if self.largest_parking_ramp.is_empty()
                || compare_ramp(&self.largest_parking_ramp, parking_type).is_lt()
            {
                self.largest_parking_ramp = parking_type.to_string();
            }
        }
        if parking_type.starts_with("RC") {
            self.counts.parking_cargo += 1;
        }
        if parking_type.starts_with("RMC") {
            self.counts.parking_mil_cargo += 1;
            self.counts.parking_mil_combat += 1;
        }

        self.airport.largest_parking_gate = self.largest_parking_gate.clone();
        self.airport.largest_parking_ramp = self.largest_parking_ramp.clone();

        self.sink.parking(&parking)
    }

    // =====================================================================
    // Taxi network

    fn bind_taxi_node(&mut self, fields: &Fields<'_>, ctx: &FileContext) {
        if self.ignoring_airport {
            return;
        }
        self.check_writing("taxi node", ctx);

        self.taxi_nodes.insert(
            fields.num::<i32>(4),
            Pos::new(fields.num(2), fields.num(1)),
        );
    }

    fn bind_taxi_edge(&mut self, fields: &Fields<'_>, ctx: &FileContext) -> Result<()> {
        if self.ignoring_airport {
            return Ok(());
        }
        self.check_writing("taxi edge", ctx);

        // Runway-derived edges duplicate the runway records
        if fields.at(4) == "runway" {
            return Ok(());
        }

        let start = self.taxi_nodes.get(&fields.num::<i32>(1)).copied();
        let end = self.taxi_nodes.get(&fields.num::<i32>(2)).copied();
        if start.is_none() || end.is_none() {
            warn!(
                "{} taxi edge references unknown node",
                ctx.message_prefix()
            );
        }
        if let Some(pos) = start {
            self.extend_rect(pos);
        }
        if let Some(pos) = end {
            self.extend_rect(pos);
        }

        let mut name = fields.tail(5);
        if GARBAGE_TAXI_NAMES.contains(&name.to_uppercase().as_str()) {
            name.clear();
        }

        self.counts.taxi_path += 1;
        let id = self.next_taxi_path_id;
        self.next_taxi_path_id += 1;
        self.sink.taxi_path(&TaxiPathRecord {
            id,
            airport_id: self.airport.id,
            path_type: "T",
            name,
            width: 0.0,
            start_pos: start,
            end_pos: end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::marking_flags;
    use crate::sink::ZeroMagVar;

    #[derive(Default)]
    struct CollectSink {
        airports: Vec<AirportRecord>,
        airport_files: Vec<AirportFileRecord>,
        runways: Vec<RunwayRecord>,
        runway_ends: Vec<RunwayEndRecord>,
        starts: Vec<StartRecord>,
        parkings: Vec<ParkingRecord>,
        aprons: Vec<ApronRecord>,
        taxi_paths: Vec<TaxiPathRecord>,
        coms: Vec<ComRecord>,
        helipads: Vec<HelipadRecord>,
    }

    impl Sink for CollectSink {
        fn airport(&mut self, airport: &AirportRecord) -> Result<()> {
            self.airports.push(airport.clone());
            Ok(())
        }
        fn airport_file(&mut self, file: &AirportFileRecord) -> Result<()> {
            self.airport_files.push(file.clone());
            Ok(())
        }
        fn runway(&mut self, runway: &RunwayRecord) -> Result<()> {
            self.runways.push(runway.clone());
            Ok(())
        }
        fn runway_ends(&mut self, ends: &[RunwayEndRecord]) -> Result<()> {
            self.runway_ends.extend_from_slice(ends);
            Ok(())
        }
        fn start(&mut self, start: &StartRecord) -> Result<()> {
            self.starts.push(start.clone());
            Ok(())
        }
        fn parking(&mut self, parking: &ParkingRecord) -> Result<()> {
            self.parkings.push(parking.clone());
            Ok(())
        }
        fn apron(&mut self, apron: &ApronRecord) -> Result<()> {
            self.aprons.push(apron.clone());
            Ok(())
        }
        fn taxi_path(&mut self, path: &TaxiPathRecord) -> Result<()> {
            self.taxi_paths.push(path.clone());
            Ok(())
        }
        fn com(&mut self, com: &ComRecord) -> Result<()> {
            self.coms.push(com.clone());
            Ok(())
        }
        fn helipad(&mut self, helipad: &HelipadRecord) -> Result<()> {
            self.helipads.push(helipad.clone());
            Ok(())
        }
    }

    fn ingest(input: &str) -> CollectSink {
        ingest_with_options(input, IngestOptions::new())
    }

    fn ingest_with_options(input: &str, options: IngestOptions) -> CollectSink {
        let mut sink = CollectSink::default();
        let mut index = AirportIndex::new();
        let mag_var = ZeroMagVar;
        let mut writer = AirportWriter::new(&mut sink, &mut index, &options, &mag_var);
        let mut ctx = FileContext {
            file_id: 1,
            file_name: "apt.dat".to_string(),
            ..Default::default()
        };
        for line in input.lines() {
            ctx.line_num += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            writer.write(&Fields::split(line), &ctx).unwrap();
        }
        writer.finish(&ctx).unwrap();
        drop(writer);
        sink
    }

    // A 1000 m east-west runway on the equator.
    const RUNWAY_09_27: &str =
        "100 30.00 1 0 0.25 1 2 1 09 0.0 8.0 100 50 3 8 1 1 27 0.0 8.0089932 0 0 3 0 0 0";

    #[test]
    fn land_runway_derives_geometry_and_lighting() {
        let sink = ingest(&format!("1 433 0 0 KTST Test Field\n{RUNWAY_09_27}\n"));

        assert_eq!(sink.runways.len(), 1);
        let runway = &sink.runways[0];
        assert!((runway.length - 3280.84).abs() < 5.0, "length {}", runway.length);
        assert!((runway.width - 98.43).abs() < 0.01);
        assert!((runway.heading - 90.0).abs() < 0.1);
        assert_eq!(runway.surface, "A");
        assert_eq!(runway.edge_light, Some("M"));
        assert_eq!(runway.center_light, Some("M"));
        assert_ne!(runway.marking_flags & marking_flags::PRECISION, 0);

        assert_eq!(sink.runway_ends.len(), 2);
        let primary = &sink.runway_ends[0];
        let secondary = &sink.runway_ends[1];
        assert_eq!(primary.name, "09");
        assert_eq!(secondary.name, "27");
        assert_eq!(primary.end_type, RunwayEndType::Primary);
        assert_eq!(secondary.end_type, RunwayEndType::Secondary);
        assert!((primary.heading - 90.0).abs() < 0.1);
        assert!((secondary.heading - 270.0).abs() < 0.1);
        assert!((primary.offset_threshold - meter_to_feet(100.0)).abs() < 0.01);
        assert!((primary.blast_pad - meter_to_feet(50.0)).abs() < 0.01);
        assert_eq!(primary.als, Some("MALSR"));
        assert!(primary.has_reils);
        assert!(primary.has_touchdown_lights);
        assert_eq!(secondary.als, None);
        assert!(!secondary.has_reils);

        // Two start positions referencing the ends
        assert_eq!(sink.starts.len(), 2);
        assert_eq!(sink.starts[0].start_type, "R");
        assert_eq!(sink.starts[0].runway_end_id, Some(primary.id));
        assert_eq!(sink.starts[1].runway_end_id, Some(secondary.id));

        let airport = &sink.airports[0];
        assert_eq!(airport.num_runways, 1);
        assert_eq!(airport.num_runway_hard, 1);
        assert_eq!(airport.num_runway_soft, 0);
        assert_eq!(airport.num_runway_light, 1);
        assert_eq!(airport.num_runway_end_als, 1);
        assert_eq!(airport.num_start, 2);
        assert!((airport.longest_runway_length - runway.length).abs() < 1e-9);
        assert_eq!(airport.longest_runway_surface, "A");

        // Rectangle covers both thresholds, position is its center
        let rect = airport.rect.unwrap();
        assert!(rect.contains(Pos::new(8.0, 0.0)));
        assert!(rect.contains(Pos::new(8.0089932, 0.0)));
        let pos = airport.pos.unwrap();
        assert!((pos.lon - 8.0044966).abs() < 1e-6);
    }

    #[test]
    fn water_runway_has_no_lighting_or_markings() {
        let sink = ingest("1 0 0 0 KWTR Water Base\n101 30 0 08 0.0 8.0 26 0.0 8.005\n");

        let runway = &sink.runways[0];
        assert_eq!(runway.surface, "W");
        assert_eq!(runway.edge_light, None);
        assert_eq!(runway.center_light, None);
        assert_eq!(runway.marking_flags, 0);
        assert_eq!(sink.runway_ends[0].als, None);
        assert!(!sink.runway_ends[0].has_reils);

        let airport = &sink.airports[0];
        assert_eq!(airport.num_runway_water, 1);
        assert_eq!(airport.num_runway_hard, 0);
        assert_eq!(airport.num_runway_light, 0);
    }

    #[test]
    fn airport_name_heuristics_apply() {
        let sink = ingest("17 120 0 0 XH01 [H] CITY HOSPITAL [x] closed\n");
        let airport = &sink.airports[0];
        assert_eq!(airport.name, "City Hospital Closed");
        assert!(airport.is_closed);
        assert!(!airport.is_military);

        let sink = ingest("1 705 0 0 KEDW EDWARDS AFB\n");
        let airport = &sink.airports[0];
        assert_eq!(airport.name, "Edwards AFB");
        assert!(airport.is_military);
    }

    #[test]
    fn duplicate_ident_is_ignored_but_audited() {
        let input = format!(
            "1 433 0 0 KSEA First\n1 433 0 0 KSEA Second\n{RUNWAY_09_27}\n1 20 0 0 KBFI Third\n"
        );
        let sink = ingest(&input);

        // One airport row per unique ident, one audit row per header
        assert_eq!(sink.airports.len(), 2);
        assert_eq!(sink.airports[0].name, "First");
        assert_eq!(sink.airports[1].name, "Third");
        assert_eq!(sink.airport_files.len(), 3);
        assert!(sink.airport_files.iter().all(|f| f.file_id == 1));

        // The runway inside the ignored block was dropped
        assert!(sink.runways.is_empty());
    }

    #[test]
    fn include_filter_skips_other_airports() {
        let options = IngestOptions::new().include_ident("KBFI");
        let input = "1 433 0 0 KSEA First\n1 20 0 0 KBFI Second\n";
        let sink = ingest_with_options(input, options);

        assert_eq!(sink.airports.len(), 1);
        assert_eq!(sink.airports[0].ident, "KBFI");
        assert_eq!(sink.airport_files.len(), 2);
    }

    #[test]
    fn parking_gate_with_width_code_gets_size_and_radius() {
        let input = "1 10 0 0 KPRK Park Field\n\
                     1300 47.0 8.0 90.0 gate all A1\n\
                     1301 D none DLH\n";
        let sink = ingest(input);

        assert_eq!(sink.parkings.len(), 1);
        let parking = &sink.parkings[0];
        assert_eq!(parking.parking_type, "GM");
        assert!((parking.radius - 80.0).abs() < 1e-9);
        assert_eq!(parking.airline_codes.as_deref(), Some("DLH"));
        assert_eq!(parking.name, "A1");
        assert_eq!(parking.number, -1);

        let airport = &sink.airports[0];
        assert_eq!(airport.num_parking, 1);
        assert_eq!(airport.num_parking_gate, 1);
        assert_eq!(airport.largest_parking_gate, "GM");
    }

    #[test]
    fn largest_gate_tracker_prefers_heavy() {
        let input = "1 10 0 0 KPRK Park Field\n\
                     1300 47.0 8.0 90.0 gate all A1\n\
                     1301 B none\n\
                     1300 47.0 8.0 90.0 gate all A2\n\
                     1301 E none\n\
                     1300 47.0 8.0 90.0 gate all A3\n\
                     1301 C none\n";
        let sink = ingest(input);

        let types: Vec<&str> = sink.parkings.iter().map(|p| p.parking_type.as_str()).collect();
        assert_eq!(types, vec!["GS", "GH", "GM"]);

        let airport = &sink.airports[0];
        assert_eq!(airport.num_parking_gate, 3);
        assert_eq!(airport.largest_parking_gate, "GH");
    }

    #[test]
    fn ramp_categories_are_counted() {
        let input = "1 10 0 0 KRMP Ramp Field\n\
                     1300 47.0 8.0 90.0 tie-down all GA1\n\
                     1301 B general_aviation\n\
                     1300 47.0 8.0 90.0 misc all C1\n\
                     1301 E cargo\n";
        let sink = ingest(input);

        assert_eq!(sink.parkings[0].parking_type, "RGAS");
        assert_eq!(sink.parkings[1].parking_type, "RC");

        let airport = &sink.airports[0];
        assert_eq!(airport.num_parking, 2);
        assert_eq!(airport.num_parking_ga_ramp, 1);
        assert_eq!(airport.num_parking_cargo, 1);
        assert_eq!(airport.largest_parking_ramp, "RGAS");
    }

    #[test]
    fn fuel_stand_sets_airport_fuel_flags() {
        let input = "1 10 0 0 KFUL Fuel Field\n\
                     1300 47.0 8.0 90.0 misc all Avgas Pump\n\
                     1301 A none\n";
        let sink = ingest(input);

        let parking = &sink.parkings[0];
        // Width metadata must not append a size letter to fuel stands
        assert_eq!(parking.parking_type, "FUEL");
        assert!((parking.radius - 25.0).abs() < 1e-9);

        let airport = &sink.airports[0];
        assert!(airport.has_avgas);
        assert!(!airport.has_jetfuel);
    }

    #[test]
    fn legacy_startup_row_is_flushed_untyped() {
        let sink = ingest("1 10 0 0 KLEG Legacy Field\n15 47.1 8.1 180.0 GA Ramp\n");

        assert_eq!(sink.parkings.len(), 1);
        let parking = &sink.parkings[0];
        assert_eq!(parking.parking_type, "");
        assert_eq!(parking.name, "GA Ramp");
        assert!((parking.radius - 50.0).abs() < 1e-9);
        assert!((parking.heading - 180.0).abs() < 1e-9);

        let airport = &sink.airports[0];
        assert_eq!(airport.num_parking, 1);
        assert_eq!(airport.num_parking_gate, 0);
    }

    #[test]
    fn metadata_without_open_stand_is_ignored() {
        let sink = ingest("1 10 0 0 KMET Field\n1301 D none DLH\n");
        assert!(sink.parkings.is_empty());
        assert_eq!(sink.airports.len(), 1);
    }

    #[test]
    fn truck_services_set_fuel_flags() {
        let input = "1 10 0 0 KTRK Truck Field\n\
                     1400 47.0 8.0 90.0 baggage_loader|fuel_liners Truck 1\n\
                     1401 47.0 8.0 90.0 fuel_props Truck 2\n";
        let sink = ingest(input);

        let airport = &sink.airports[0];
        assert!(airport.has_avgas);
        assert!(airport.has_jetfuel);
    }

    #[test]
    fn weather_com_scans_atis_before_awos() {
        let input = "1 10 0 0 KCOM Com Field\n\
                     50 11920 Big Field ATIS AWOS 3\n\
                     50 12670 Seattle weather\n\
                     50 13520 Hill AWOS 3\n\
                     54 11890 Tower\n\
                     51 12280 Unicom\n";
        let sink = ingest(input);

        assert_eq!(sink.coms.len(), 5);
        // A name mentioning both services is an ATIS
        assert_eq!(sink.coms[0].com_type, "ATIS");
        assert_eq!(sink.coms[0].frequency, 119_200);
        // No service in the name defaults to ATIS
        assert_eq!(sink.coms[1].com_type, "ATIS");
        assert_eq!(sink.coms[2].com_type, "AWOS");
        assert_eq!(sink.coms[3].com_type, "T");
        assert_eq!(sink.coms[4].com_type, "UC");

        let airport = &sink.airports[0];
        assert_eq!(airport.num_com, 5);
        assert_eq!(airport.atis_frequency, Some(126_700));
        assert_eq!(airport.awos_frequency, Some(135_200));
        assert_eq!(airport.tower_frequency, Some(118_900));
        assert_eq!(airport.unicom_frequency, Some(122_800));
    }

    #[test]
    fn vasi_amends_runway_end_by_name_and_heading() {
        let input = format!(
            "1 433 0 0 KVAS Vasi Field\n\
             {RUNWAY_09_27}\n\
             21 0.0 8.001 2 92.0 3.5 09\n\
             21 0.0 8.008 3 268.0 3.0\n\
             21 0.0 8.004 6 90.0 0.0 09\n"
        );
        let sink = ingest(&input);

        let primary = sink.runway_ends.iter().find(|e| e.name == "09").unwrap();
        assert_eq!(primary.vasi_type, Some("PAPI4"));
        assert!((primary.vasi_pitch - 3.5).abs() < 1e-9);
        assert_eq!(primary.right_vasi_type, Some("UNKN"));

        // Second row has no runway name, matched on heading 268 vs 270
        let secondary = sink.runway_ends.iter().find(|e| e.name == "27").unwrap();
        assert_eq!(secondary.vasi_type, Some("PAPI4"));
        assert!((secondary.vasi_pitch - 3.0).abs() < 1e-9);

        // Runway guard lights are not an approach indicator
        let airport = &sink.airports[0];
        assert_eq!(airport.num_runway_end_vasi, 2);
    }

    #[test]
    fn helipad_gets_numbered_start() {
        let input = "1 120 0 0 KHEL Heli Field\n\
                     102 H1 47.0 8.0 90.0 30.0 30.0 2 0 0 0.25 0\n\
                     102 H2 47.1 8.1 0.0 20.0 20.0 1 0 0 0.25 0\n";
        let sink = ingest(input);

        assert_eq!(sink.helipads.len(), 2);
        let first = &sink.helipads[0];
        assert_eq!(first.surface, "C");
        assert!((first.length - meter_to_feet(30.0)).abs() < 0.01);
        assert!((first.heading - 90.0).abs() < 1e-9);
        assert_eq!(sink.helipads[1].surface, "A");

        assert_eq!(sink.starts.len(), 2);
        assert_eq!(sink.starts[0].start_type, "H");
        assert_eq!(sink.starts[0].runway_name, "01");
        assert_eq!(sink.starts[0].number, Some(1));
        assert_eq!(sink.starts[1].runway_name, "02");
        assert_eq!(sink.starts[0].id, sink.helipads[0].start_id);

        let airport = &sink.airports[0];
        assert_eq!(airport.num_helipad, 2);
        assert_eq!(airport.num_start, 2);
    }

    #[test]
    fn viewpoint_sets_tower_and_rating_point() {
        let sink = ingest("1 433 0 0 KTWR Tower Field\n14 47.02 8.01 100 0 Tower\n");

        let airport = &sink.airports[0];
        assert!(airport.has_tower_object);
        let tower = airport.tower_pos.unwrap();
        assert!((tower.lat - 47.02).abs() < 1e-9);
        assert!((tower.lon - 8.01).abs() < 1e-9);
        assert!((airport.tower_altitude.unwrap() - 533.0).abs() < 1e-9);
        assert_eq!(airport.rating, 1);
    }

    #[test]
    fn pavement_boundary_and_holes_become_one_apron() {
        let input = "1 10 0 0 KPAV Pav Field\n\
                     110 2 0.25 90.0 Main Apron\n\
                     111 0.0 8.0\n\
                     111 0.0 8.002\n\
                     112 0.002 8.002 0.001 8.001\n\
                     113 0.002 8.0\n\
                     111 0.0005 8.0005\n\
                     111 0.0005 8.0015\n\
                     113 0.0015 8.001\n\
                     50 12670 ATIS\n";
        let sink = ingest(input);

        assert_eq!(sink.aprons.len(), 1);
        let apron = &sink.aprons[0];
        assert_eq!(apron.surface, "C");
        assert!(apron.is_draw_surface);

        // One boundary ring and one hole ring with a control point node
        let geometry = &apron.geometry;
        assert!(geometry.starts_with(r#"{"type":"Polygon""#));
        assert!(geometry.contains("[8.002,0.002,8.001,0.001]"));
        assert!(geometry.contains("[8.0005,0.0005]"));

        let airport = &sink.airports[0];
        assert_eq!(airport.num_apron, 1);
        // Apron nodes participate in the bounding rectangle
        assert!(airport.rect.unwrap().contains(Pos::new(8.002, 0.002)));
    }

    #[test]
    fn pavement_header_without_nodes_is_dropped() {
        let input = "1 10 0 0 KPAV Pav Field\n\
                     110 1 0.25 90.0 Empty\n\
                     50 12670 ATIS\n";
        let sink = ingest(input);

        assert!(sink.aprons.is_empty());
        assert_eq!(sink.airports[0].num_apron, 0);
    }

    #[test]
    fn taxi_edges_resolve_nodes_and_drop_garbage_names() {
        let input = "1 10 0 0 KTAX Taxi Field\n\
                     1201 0.0 8.0 both 1 A\n\
                     1201 0.001 8.0 both 2 B\n\
                     1202 1 2 twoway taxiway F\n\
                     1202 1 2 twoway taxiway TWY\n\
                     1202 1 2 twoway runway 09/27\n\
                     1202 1 7 twoway taxiway G\n";
        let sink = ingest(input);

        // Runway-typed edges are skipped entirely
        assert_eq!(sink.taxi_paths.len(), 3);
        assert_eq!(sink.taxi_paths[0].name, "F");
        assert!(sink.taxi_paths[0].start_pos.is_some());
        assert!(sink.taxi_paths[0].end_pos.is_some());
        assert_eq!(sink.taxi_paths[1].name, "");
        // Unresolvable node id leaves the endpoint empty
        assert!(sink.taxi_paths[2].end_pos.is_none());

        let airport = &sink.airports[0];
        assert_eq!(airport.num_taxi_path, 3);
        assert_eq!(airport.rating, 1);
    }

    #[test]
    fn metadata_rows_fill_administrative_fields() {
        let input = "1 10 0 0 KMET Meta Field\n\
                     1302 city Seattle\n\
                     1302 country United States\n\
                     1302 region_code US-WA\n\
                     1302 datum_lat 47.5\n\
                     1302 datum_lon 8.25\n";
        let sink = ingest(input);

        let airport = &sink.airports[0];
        assert_eq!(airport.city, "Seattle");
        assert_eq!(airport.country, "United States");
        assert_eq!(airport.region, "US-WA");
    }

    #[test]
    fn datum_becomes_rect_when_no_geometry_exists() {
        let input = "1 10 0 0 KDAT Datum Field\n\
                     1302 datum_lat 47.5\n\
                     1302 datum_lon 8.25\n";
        let sink = ingest(input);

        let airport = &sink.airports[0];
        let pos = airport.pos.unwrap();
        assert!((pos.lat - 47.5).abs() < 1e-9);
        assert!((pos.lon - 8.25).abs() < 1e-9);

        // Point rectangle was inflated to the minimum margin
        let rect = airport.rect.unwrap();
        assert!(!rect.is_point());
        assert!((rect.max_lon - rect.min_lon - 2.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn zero_datum_values_are_discarded() {
        let input = "1 10 0 0 KZER Zero Field\n\
                     1302 datum_lat 0.0\n\
                     1302 datum_lon 0.0\n";
        let sink = ingest(input);

        let airport = &sink.airports[0];
        assert!(airport.rect.is_none());
        assert!(airport.pos.is_none());
    }

    #[test]
    fn datum_outside_rect_falls_back_to_runway_center() {
        let input = format!(
            "1 433 0 0 KOUT Out Field\n\
             {RUNWAY_09_27}\n\
             1302 datum_lat 47.5\n\
             1302 datum_lon 8.25\n"
        );
        let sink = ingest(&input);

        // Single runway: the implausible datum loses to its center
        let pos = sink.airports[0].pos.unwrap();
        assert!(pos.lat.abs() < 1e-6);
        assert!((pos.lon - 8.0044966).abs() < 1e-6);
    }

    #[test]
    fn airport_without_any_geometry_has_no_position() {
        let sink = ingest("1 10 0 0 KEMT Empty Field\n");
        let airport = &sink.airports[0];
        assert!(airport.rect.is_none());
        assert!(airport.pos.is_none());
        assert!((airport.mag_var).abs() < 1e-9);
    }

    #[test]
    fn gate_and_ramp_comparators_rank_sizes() {
        use std::cmp::Ordering::*;
        assert_eq!(compare_gate("GH", "GM"), Greater);
        assert_eq!(compare_gate("GM", "GH"), Less);
        assert_eq!(compare_gate("GS", "GM"), Less);
        assert_eq!(compare_gate("GM", "GS"), Greater);
        assert_eq!(compare_gate("GM", "GM"), Equal);
        assert_eq!(compare_ramp("RGAL", "RGAM"), Greater);
        assert_eq!(compare_ramp("RGAS", "RGAM"), Less);
        assert_eq!(compare_ramp("RGAM", "RGAM"), Equal);
    }

    #[test]
    fn width_code_table() {
        assert_eq!(parking_size_for_width_code("A"), (25.0, "S"));
        assert_eq!(parking_size_for_width_code("D"), (80.0, "M"));
        assert_eq!(parking_size_for_width_code("F"), (130.0, "H"));
        assert_eq!(parking_size_for_width_code("Z"), (10.0, "S"));
        assert_eq!(parking_size_for_width_code(""), (10.0, "S"));
    }

    #[test]
    fn longest_runway_wins_over_shorter() {
        let input = "1 433 0 0 KLNG Long Field\n\
                     100 20.00 3 0 0.25 0 0 0 09 0.0 8.0 0 0 0 0 0 0 27 0.0 8.003 0 0 0 0 0 0\n\
                     100 45.00 1 0 0.25 0 0 0 18 0.0 8.01 0 0 0 0 0 0 36 0.018 8.01 0 0 0 0 0 0\n";
        let sink = ingest(input);

        let airport = &sink.airports[0];
        assert_eq!(airport.num_runways, 2);
        assert_eq!(airport.num_runway_soft, 1);
        assert_eq!(airport.num_runway_hard, 1);
        assert_eq!(airport.longest_runway_surface, "A");
        assert!((airport.longest_runway_width - meter_to_feet(45.0)).abs() < 0.01);
        // Second runway is about 2 km long
        assert!(airport.longest_runway_length > 6000.0);
    }
}
