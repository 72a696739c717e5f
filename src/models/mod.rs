//! Data models for Reserva

pub mod booking;
pub mod classroom;
pub mod equipment;
pub mod period;
pub mod user;

// Re-export commonly used types
pub use booking::{Booking, BookingDetails, BookingStatus, BookingType};
pub use classroom::Classroom;
pub use equipment::Equipment;
pub use period::{PeriodSchedule, PeriodWindow};
pub use user::{Role, User, UserShort};
