pub mod departures;

pub use departures::select_next;
