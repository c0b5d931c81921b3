//! Order-sensitive interpreter for X-Plane `apt.dat` airport scenery
//! files.
//!
//! The format is a line stream of row-coded records: an airport header
//! opens a block and every following row belongs to it until the next
//! header or the end marker. This crate turns such a stream into
//! normalized relational entities (airports, runways and their ends,
//! start positions, parking stands, aprons, taxi paths, com
//! frequencies, helipads) plus per-airport aggregates like facility
//! counts, the longest runway, the bounding rectangle and a 0-5 rating.
//!
//! Persistence is abstracted behind the [`Sink`] trait; the binary
//! shipping with this workspace implements it on top of SQLite.
//!
//! ```no_run
//! use aptdat_engine::{
//!     read_apt_dat, AirportIndex, AirportWriter, FileContext, IngestOptions, ZeroMagVar,
//! };
//! # fn run(sink: &mut impl aptdat_engine::Sink) -> anyhow::Result<()> {
//! let mut index = AirportIndex::new();
//! let options = IngestOptions::new();
//! let mag_var = ZeroMagVar;
//! let mut writer = AirportWriter::new(sink, &mut index, &options, &mag_var);
//!
//! let ctx = FileContext {
//!     file_id: 1,
//!     file_name: "apt.dat".to_string(),
//!     ..Default::default()
//! };
//! let file = std::io::BufReader::new(std::fs::File::open("apt.dat")?);
//! read_apt_dat(file, &mut writer, &ctx)?;
//! # Ok(())
//! # }
//! ```

pub mod codes;
pub mod entities;
pub mod fields;
pub mod geo;
pub mod index;
pub mod options;
pub mod pavement;
pub mod reader;
pub mod sink;
pub mod util;
pub mod writer;

pub use fields::Fields;
pub use index::AirportIndex;
pub use options::{FileContext, IngestOptions};
pub use reader::{read_apt_dat, ReadError};
pub use sink::{MagVarSource, Sink, ZeroMagVar};
pub use writer::AirportWriter;
