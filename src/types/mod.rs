pub mod batch;
pub mod observation;
pub mod openweather;
pub mod stored_object;
