// scenery-db-builder/src/main.rs
// Reads X-Plane apt.dat airport scenery files into a SQLite database
// with one table per entity kind (snake_case columns).

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::{params, Connection};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use aptdat_engine::entities::{
    AirportFileRecord, AirportRecord, ApronRecord, ComRecord, HelipadRecord, ParkingRecord,
    RunwayEndRecord, RunwayRecord, StartRecord, TaxiPathRecord,
};
use aptdat_engine::{
    read_apt_dat, AirportIndex, AirportWriter, FileContext, IngestOptions, Sink, ZeroMagVar,
};

// ---------------------------------------------------------------------------
// CLI args
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "scenery-db-builder", about = "Build airport scenery database from apt.dat files")]
struct Args {
    /// apt.dat files, read in order; the first occurrence of an airport
    /// identifier wins
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    #[arg(short, long)]
    output: PathBuf,

    /// Only ingest these airport identifiers
    #[arg(long)]
    include_ident: Vec<String>,

    /// Never ingest these airport identifiers
    #[arg(long)]
    exclude_ident: Vec<String>,

    /// Treat the input files as add-on scenery
    #[arg(long)]
    addon: bool,

    /// Treat the input files as 3D scenery
    #[arg(long = "is-3d")]
    is_3d: bool,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if args.output.exists() {
        std::fs::remove_file(&args.output)?;
    }

    let conn = Connection::open(&args.output).context("Failed to open output database")?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

    run_migrations(&conn)?;

    let mut options = IngestOptions::new();
    for ident in &args.include_ident {
        options = options.include_ident(ident);
    }
    for ident in &args.exclude_ident {
        options = options.exclude_ident(ident);
    }

    let mut index = AirportIndex::new();
    let mag_var = ZeroMagVar;
    let mut sink = SqliteSink { conn: &conn };
    let mut writer = AirportWriter::new(&mut sink, &mut index, &options, &mag_var);

    // One session across all files: ids stay unique and the first file
    // mentioning an airport wins.
    for (file_num, path) in args.inputs.iter().enumerate() {
        info!("Reading {}", path.display());
        let ctx = FileContext {
            file_id: file_num as i64 + 1,
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            local_path: path
                .parent()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            is_addon: args.addon,
            is_3d: args.is_3d,
            line_num: 0,
        };

        let file = BufReader::new(
            File::open(path).with_context(|| format!("Cannot open {}", path.display()))?,
        );
        conn.execute_batch("BEGIN")?;
        read_apt_dat(file, &mut writer, &ctx)?;
        conn.execute_batch("COMMIT")?;
    }

    info!("Done. {} airports written. Row counts:", writer.airports_written());
    drop(writer);

    for table in [
        "airport",
        "airport_file",
        "runway",
        "runway_end",
        "start",
        "parking",
        "apron",
        "taxi_path",
        "com",
        "helipad",
    ] {
        let count: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
        info!("  {table}: {count}");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(MIGRATIONS).context("Migration failed")?;
    Ok(())
}

// Child rows are inserted while their airport block is still open and the
// airport row only lands at finalize, so no enforced foreign keys.
const MIGRATIONS: &str = r#"
CREATE TABLE IF NOT EXISTS airport (
    airport_id             INTEGER PRIMARY KEY,
    file_id                INTEGER NOT NULL,
    ident                  TEXT NOT NULL,
    name                   TEXT NOT NULL DEFAULT '',
    city                   TEXT NOT NULL DEFAULT '',
    country                TEXT NOT NULL DEFAULT '',
    region                 TEXT NOT NULL DEFAULT '',
    is_closed              INTEGER NOT NULL DEFAULT 0,
    is_military            INTEGER NOT NULL DEFAULT 0,
    is_addon               INTEGER NOT NULL DEFAULT 0,
    is_3d                  INTEGER NOT NULL DEFAULT 0,
    has_avgas              INTEGER NOT NULL DEFAULT 0,
    has_jetfuel            INTEGER NOT NULL DEFAULT 0,
    has_tower_object       INTEGER NOT NULL DEFAULT 0,
    tower_frequency        INTEGER,
    atis_frequency         INTEGER,
    awos_frequency         INTEGER,
    asos_frequency         INTEGER,
    unicom_frequency       INTEGER,
    tower_lonx             REAL,
    tower_laty             REAL,
    tower_altitude         REAL,
    num_com                INTEGER NOT NULL DEFAULT 0,
    num_start              INTEGER NOT NULL DEFAULT 0,
    num_apron              INTEGER NOT NULL DEFAULT 0,
    num_taxi_path          INTEGER NOT NULL DEFAULT 0,
    num_helipad            INTEGER NOT NULL DEFAULT 0,
    num_runway_end_vasi    INTEGER NOT NULL DEFAULT 0,
    num_runway_end_als     INTEGER NOT NULL DEFAULT 0,
    num_runways            INTEGER NOT NULL DEFAULT 0,
    num_runway_hard        INTEGER NOT NULL DEFAULT 0,
    num_runway_soft        INTEGER NOT NULL DEFAULT 0,
    num_runway_water       INTEGER NOT NULL DEFAULT 0,
    num_runway_light       INTEGER NOT NULL DEFAULT 0,
    num_parking            INTEGER NOT NULL DEFAULT 0,
    num_parking_gate       INTEGER NOT NULL DEFAULT 0,
    num_parking_ga_ramp    INTEGER NOT NULL DEFAULT 0,
    num_parking_cargo      INTEGER NOT NULL DEFAULT 0,
    num_parking_mil_cargo  INTEGER NOT NULL DEFAULT 0,
    num_parking_mil_combat INTEGER NOT NULL DEFAULT 0,
    longest_runway_length  REAL NOT NULL DEFAULT 0.0,
    longest_runway_width   REAL NOT NULL DEFAULT 0.0,
    longest_runway_heading REAL NOT NULL DEFAULT 0.0,
    longest_runway_surface TEXT NOT NULL DEFAULT 'UNKNOWN',
    largest_parking_gate   TEXT NOT NULL DEFAULT '',
    largest_parking_ramp   TEXT NOT NULL DEFAULT '',
    rating                 INTEGER NOT NULL DEFAULT 0,
    left_lonx              REAL,
    top_laty               REAL,
    right_lonx             REAL,
    bottom_laty            REAL,
    lonx                   REAL,
    laty                   REAL,
    mag_var                REAL NOT NULL DEFAULT 0.0,
    altitude               REAL NOT NULL DEFAULT 0.0,
    scenery_local_path     TEXT NOT NULL DEFAULT '',
    file_name              TEXT NOT NULL DEFAULT ''
);
CREATE INDEX IF NOT EXISTS idx_airport_ident ON airport(ident);
CREATE TABLE IF NOT EXISTS airport_file (
    airport_file_id INTEGER PRIMARY KEY,
    file_id         INTEGER NOT NULL,
    ident           TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_airport_file_ident ON airport_file(ident);
CREATE TABLE IF NOT EXISTS runway (
    runway_id        INTEGER PRIMARY KEY,
    airport_id       INTEGER NOT NULL,
    primary_end_id   INTEGER NOT NULL,
    secondary_end_id INTEGER NOT NULL,
    surface          TEXT NOT NULL DEFAULT 'UNKNOWN',
    shoulder         TEXT,
    length           REAL NOT NULL DEFAULT 0.0,
    width            REAL NOT NULL DEFAULT 0.0,
    heading          REAL NOT NULL DEFAULT 0.0,
    marking_flags    INTEGER NOT NULL DEFAULT 0,
    edge_light       TEXT,
    center_light     TEXT,
    primary_lonx     REAL NOT NULL DEFAULT 0.0,
    primary_laty     REAL NOT NULL DEFAULT 0.0,
    secondary_lonx   REAL NOT NULL DEFAULT 0.0,
    secondary_laty   REAL NOT NULL DEFAULT 0.0,
    altitude         REAL NOT NULL DEFAULT 0.0,
    lonx             REAL NOT NULL DEFAULT 0.0,
    laty             REAL NOT NULL DEFAULT 0.0
);
CREATE INDEX IF NOT EXISTS idx_runway_airport ON runway(airport_id);
CREATE TABLE IF NOT EXISTS runway_end (
    runway_end_id        INTEGER PRIMARY KEY,
    name                 TEXT NOT NULL,
    end_type             TEXT NOT NULL DEFAULT 'P',
    offset_threshold     REAL NOT NULL DEFAULT 0.0,
    blast_pad            REAL NOT NULL DEFAULT 0.0,
    als                  TEXT,
    has_reils            INTEGER NOT NULL DEFAULT 0,
    has_touchdown_lights INTEGER NOT NULL DEFAULT 0,
    has_closed_markings  INTEGER NOT NULL DEFAULT 0,
    vasi_type            TEXT,
    vasi_pitch           REAL NOT NULL DEFAULT 0.0,
    right_vasi_type      TEXT,
    right_vasi_pitch     REAL NOT NULL DEFAULT 0.0,
    heading              REAL NOT NULL DEFAULT 0.0,
    lonx                 REAL NOT NULL DEFAULT 0.0,
    laty                 REAL NOT NULL DEFAULT 0.0
);
CREATE INDEX IF NOT EXISTS idx_runway_end_name ON runway_end(name);
CREATE TABLE IF NOT EXISTS start (
    start_id      INTEGER PRIMARY KEY,
    airport_id    INTEGER NOT NULL,
    runway_end_id INTEGER,
    number        INTEGER,
    runway_name   TEXT NOT NULL DEFAULT '',
    type          TEXT NOT NULL DEFAULT 'R',
    altitude      REAL NOT NULL DEFAULT 0.0,
    heading       REAL NOT NULL DEFAULT 0.0,
    lonx          REAL NOT NULL DEFAULT 0.0,
    laty          REAL NOT NULL DEFAULT 0.0
);
CREATE INDEX IF NOT EXISTS idx_start_airport ON start(airport_id);
CREATE TABLE IF NOT EXISTS parking (
    parking_id    INTEGER PRIMARY KEY,
    airport_id    INTEGER NOT NULL,
    type          TEXT NOT NULL DEFAULT '',
    name          TEXT NOT NULL DEFAULT '',
    airline_codes TEXT,
    number        INTEGER NOT NULL DEFAULT -1,
    radius        REAL NOT NULL DEFAULT 0.0,
    heading       REAL NOT NULL DEFAULT 0.0,
    has_jetway    INTEGER NOT NULL DEFAULT 0,
    lonx          REAL NOT NULL DEFAULT 0.0,
    laty          REAL NOT NULL DEFAULT 0.0
);
CREATE INDEX IF NOT EXISTS idx_parking_airport ON parking(airport_id);
CREATE TABLE IF NOT EXISTS apron (
    apron_id        INTEGER PRIMARY KEY,
    airport_id      INTEGER NOT NULL,
    surface         TEXT NOT NULL DEFAULT 'UNKNOWN',
    is_draw_surface INTEGER NOT NULL DEFAULT 1,
    is_draw_detail  INTEGER NOT NULL DEFAULT 1,
    geometry        TEXT NOT NULL DEFAULT ''
);
CREATE INDEX IF NOT EXISTS idx_apron_airport ON apron(airport_id);
CREATE TABLE IF NOT EXISTS taxi_path (
    taxi_path_id INTEGER PRIMARY KEY,
    airport_id   INTEGER NOT NULL,
    type         TEXT NOT NULL DEFAULT 'T',
    name         TEXT NOT NULL DEFAULT '',
    width        REAL NOT NULL DEFAULT 0.0,
    start_lonx   REAL,
    start_laty   REAL,
    end_lonx     REAL,
    end_laty     REAL
);
CREATE INDEX IF NOT EXISTS idx_taxi_path_airport ON taxi_path(airport_id);
CREATE TABLE IF NOT EXISTS com (
    com_id     INTEGER PRIMARY KEY,
    airport_id INTEGER NOT NULL,
    type       TEXT NOT NULL DEFAULT 'NONE',
    frequency  INTEGER NOT NULL DEFAULT 0,
    name       TEXT NOT NULL DEFAULT ''
);
CREATE INDEX IF NOT EXISTS idx_com_airport ON com(airport_id);
CREATE TABLE IF NOT EXISTS helipad (
    helipad_id INTEGER PRIMARY KEY,
    airport_id INTEGER NOT NULL,
    start_id   INTEGER NOT NULL,
    surface    TEXT NOT NULL DEFAULT 'UNKNOWN',
    length     REAL NOT NULL DEFAULT 0.0,
    width      REAL NOT NULL DEFAULT 0.0,
    heading    REAL NOT NULL DEFAULT 0.0,
    is_closed  INTEGER NOT NULL DEFAULT 0,
    altitude   REAL NOT NULL DEFAULT 0.0,
    lonx       REAL NOT NULL DEFAULT 0.0,
    laty       REAL NOT NULL DEFAULT 0.0
);
CREATE INDEX IF NOT EXISTS idx_helipad_airport ON helipad(airport_id);
"#;

// ---------------------------------------------------------------------------
// SQLite sink
// ---------------------------------------------------------------------------

/// Persists engine records with cached insert statements. Transactions
/// are driven by the caller, one per input file.
pub struct SqliteSink<'c> {
    pub conn: &'c Connection,
}

impl Sink for SqliteSink<'_> {
    fn airport(&mut self, a: &AirportRecord) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO airport
             (airport_id,file_id,ident,name,city,country,region,
              is_closed,is_military,is_addon,is_3d,has_avgas,has_jetfuel,has_tower_object,
              tower_frequency,atis_frequency,awos_frequency,asos_frequency,unicom_frequency,
              tower_lonx,tower_laty,tower_altitude,
              num_com,num_start,num_apron,num_taxi_path,num_helipad,
              num_runway_end_vasi,num_runway_end_als,
              num_runways,num_runway_hard,num_runway_soft,num_runway_water,num_runway_light,
              num_parking,num_parking_gate,num_parking_ga_ramp,num_parking_cargo,
              num_parking_mil_cargo,num_parking_mil_combat,
              longest_runway_length,longest_runway_width,longest_runway_heading,
              longest_runway_surface,largest_parking_gate,largest_parking_ramp,rating,
              left_lonx,top_laty,right_lonx,bottom_laty,lonx,laty,
              mag_var,altitude,scenery_local_path,file_name)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19,
                     ?20,?21,?22,?23,?24,?25,?26,?27,?28,?29,?30,?31,?32,?33,?34,?35,?36,
                     ?37,?38,?39,?40,?41,?42,?43,?44,?45,?46,?47,?48,?49,?50,?51,?52,?53,
                     ?54,?55,?56,?57)",
        )?;
        stmt.execute(params![
            a.id,
            a.file_id,
            a.ident,
            a.name,
            a.city,
            a.country,
            a.region,
            a.is_closed,
            a.is_military,
            a.is_addon,
            a.is_3d,
            a.has_avgas,
            a.has_jetfuel,
            a.has_tower_object,
            a.tower_frequency,
            a.atis_frequency,
            a.awos_frequency,
            a.asos_frequency,
            a.unicom_frequency,
            a.tower_pos.map(|p| p.lon),
            a.tower_pos.map(|p| p.lat),
            a.tower_altitude,
            a.num_com,
            a.num_start,
            a.num_apron,
            a.num_taxi_path,
            a.num_helipad,
            a.num_runway_end_vasi,
            a.num_runway_end_als,
            a.num_runways,
            a.num_runway_hard,
            a.num_runway_soft,
            a.num_runway_water,
            a.num_runway_light,
            a.num_parking,
            a.num_parking_gate,
            a.num_parking_ga_ramp,
            a.num_parking_cargo,
            a.num_parking_mil_cargo,
            a.num_parking_mil_combat,
            a.longest_runway_length,
            a.longest_runway_width,
            a.longest_runway_heading,
            a.longest_runway_surface,
            a.largest_parking_gate,
            a.largest_parking_ramp,
            a.rating,
            a.rect.map(|r| r.min_lon),
            a.rect.map(|r| r.max_lat),
            a.rect.map(|r| r.max_lon),
            a.rect.map(|r| r.min_lat),
            a.pos.map(|p| p.lon),
            a.pos.map(|p| p.lat),
            a.mag_var,
            a.altitude,
            a.scenery_local_path,
            a.file_name,
        ])?;
        Ok(())
    }

    fn airport_file(&mut self, f: &AirportFileRecord) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO airport_file (airport_file_id,file_id,ident) VALUES (?1,?2,?3)",
        )?;
        stmt.execute(params![f.id, f.file_id, f.ident])?;
        Ok(())
    }

    fn runway(&mut self, r: &RunwayRecord) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO runway
             (runway_id,airport_id,primary_end_id,secondary_end_id,surface,shoulder,
              length,width,heading,marking_flags,edge_light,center_light,
              primary_lonx,primary_laty,secondary_lonx,secondary_laty,altitude,lonx,laty)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19)",
        )?;
        stmt.execute(params![
            r.id,
            r.airport_id,
            r.primary_end_id,
            r.secondary_end_id,
            r.surface,
            r.shoulder,
            r.length,
            r.width,
            r.heading,
            r.marking_flags,
            r.edge_light,
            r.center_light,
            r.primary_pos.lon,
            r.primary_pos.lat,
            r.secondary_pos.lon,
            r.secondary_pos.lat,
            r.altitude,
            r.pos.lon,
            r.pos.lat,
        ])?;
        Ok(())
    }

    fn runway_ends(&mut self, ends: &[RunwayEndRecord]) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO runway_end
             (runway_end_id,name,end_type,offset_threshold,blast_pad,als,
              has_reils,has_touchdown_lights,has_closed_markings,
              vasi_type,vasi_pitch,right_vasi_type,right_vasi_pitch,heading,lonx,laty)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16)",
        )?;
        for e in ends {
            stmt.execute(params![
                e.id,
                e.name,
                e.end_type.to_db(),
                e.offset_threshold,
                e.blast_pad,
                e.als,
                e.has_reils,
                e.has_touchdown_lights,
                e.has_closed_markings,
                e.vasi_type,
                e.vasi_pitch,
                e.right_vasi_type,
                e.right_vasi_pitch,
                e.heading,
                e.pos.lon,
                e.pos.lat,
            ])?;
        }
        Ok(())
    }

    fn start(&mut self, s: &StartRecord) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO start
             (start_id,airport_id,runway_end_id,number,runway_name,type,altitude,heading,lonx,laty)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
        )?;
        stmt.execute(params![
            s.id,
            s.airport_id,
            s.runway_end_id,
            s.number,
            s.runway_name,
            s.start_type,
            s.altitude,
            s.heading,
            s.pos.lon,
            s.pos.lat,
        ])?;
        Ok(())
    }

    fn parking(&mut self, p: &ParkingRecord) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO parking
             (parking_id,airport_id,type,name,airline_codes,number,radius,heading,has_jetway,lonx,laty)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11)",
        )?;
        stmt.execute(params![
            p.id,
            p.airport_id,
            p.parking_type,
            p.name,
            p.airline_codes,
            p.number,
            p.radius,
            p.heading,
            p.has_jetway,
            p.pos.lon,
            p.pos.lat,
        ])?;
        Ok(())
    }

    fn apron(&mut self, a: &ApronRecord) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO apron
             (apron_id,airport_id,surface,is_draw_surface,is_draw_detail,geometry)
             VALUES (?1,?2,?3,?4,?5,?6)",
        )?;
        stmt.execute(params![
            a.id,
            a.airport_id,
            a.surface,
            a.is_draw_surface,
            a.is_draw_detail,
            a.geometry,
        ])?;
        Ok(())
    }

    fn taxi_path(&mut self, t: &TaxiPathRecord) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO taxi_path
             (taxi_path_id,airport_id,type,name,width,start_lonx,start_laty,end_lonx,end_laty)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
        )?;
        stmt.execute(params![
            t.id,
            t.airport_id,
            t.path_type,
            t.name,
            t.width,
            t.start_pos.map(|p| p.lon),
            t.start_pos.map(|p| p.lat),
            t.end_pos.map(|p| p.lon),
            t.end_pos.map(|p| p.lat),
        ])?;
        Ok(())
    }

    fn com(&mut self, c: &ComRecord) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO com (com_id,airport_id,type,frequency,name) VALUES (?1,?2,?3,?4,?5)",
        )?;
        stmt.execute(params![c.id, c.airport_id, c.com_type, c.frequency, c.name])?;
        Ok(())
    }

    fn helipad(&mut self, h: &HelipadRecord) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO helipad
             (helipad_id,airport_id,start_id,surface,length,width,heading,is_closed,altitude,lonx,laty)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11)",
        )?;
        stmt.execute(params![
            h.id,
            h.airport_id,
            h.start_id,
            h.surface,
            h.length,
            h.width,
            h.heading,
            h.is_closed,
            h.altitude,
            h.pos.lon,
            h.pos.lat,
        ])?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
