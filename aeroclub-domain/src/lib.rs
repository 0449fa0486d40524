pub mod aircraft;
pub mod booking;
pub mod conflict;
pub mod events;
pub mod repository;
pub mod timerange;

pub use aircraft::{Aircraft, AircraftStatus, MaintenanceWindow};
pub use booking::{Booking, BookingRequest, BookingStatus, PaymentType, Role};
pub use conflict::{Conflict, ConflictDetails, ConflictType};
pub use timerange::{TimeRange, TimeRangeError};
