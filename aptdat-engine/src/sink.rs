//! The persistence boundary and the other external collaborators the
//! session calls out to.

use anyhow::Result;

use crate::entities::{
    AirportFileRecord, AirportRecord, ApronRecord, ComRecord, HelipadRecord, ParkingRecord,
    RunwayEndRecord, RunwayRecord, StartRecord, TaxiPathRecord,
};
use crate::geo::Pos;

/// Receives finished entity records for persistence, one call per
/// record.
///
/// Emission order is stable: child records are emitted only after their
/// parent airport's identifier has been assigned, and the airport row
/// itself plus the runway-end batch arrive last, at finalize. The
/// implementation owns its own transaction boundary.
pub trait Sink {
    fn airport(&mut self, airport: &AirportRecord) -> Result<()>;
    fn airport_file(&mut self, file: &AirportFileRecord) -> Result<()>;
    fn runway(&mut self, runway: &RunwayRecord) -> Result<()>;
    fn runway_ends(&mut self, ends: &[RunwayEndRecord]) -> Result<()>;
    fn start(&mut self, start: &StartRecord) -> Result<()>;
    fn parking(&mut self, parking: &ParkingRecord) -> Result<()>;
    fn apron(&mut self, apron: &ApronRecord) -> Result<()>;
    fn taxi_path(&mut self, path: &TaxiPathRecord) -> Result<()>;
    fn com(&mut self, com: &ComRecord) -> Result<()>;
    fn helipad(&mut self, helipad: &HelipadRecord) -> Result<()>;
}

/// Magnetic variation lookup for a position, in degrees.
pub trait MagVarSource {
    fn mag_var(&self, pos: Pos) -> f64;
}

/// A source reporting zero declination everywhere, for callers without
/// magnetic model data.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroMagVar;

impl MagVarSource for ZeroMagVar {
    fn mag_var(&self, _pos: Pos) -> f64 {
        0.0
    }
}
