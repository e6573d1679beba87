pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod parser;
pub mod records;
pub mod stats;

pub mod gtfs_rt {
    include!(concat!(env!("OUT_DIR"), "/transit_realtime.rs"));
}
