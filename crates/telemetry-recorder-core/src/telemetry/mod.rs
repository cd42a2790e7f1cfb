mod decoder;
mod live_buffer;
mod reading;

pub use {decoder::PayloadDecoder, live_buffer::LiveBuffer, reading::SensorReading};
