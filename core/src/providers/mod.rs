/// External data providers used to ground simulations
pub mod weather;

pub use weather::{WeatherConfig, WeatherProvider, WeatherSnapshot};
