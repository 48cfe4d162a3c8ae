//! I/O operations for reading and writing feature data

mod geojson;

pub use geojson::{
    feature_collection_to_string, parse_feature_collection, read_feature_collection,
    write_feature_collection,
};
