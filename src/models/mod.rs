//! Data models module
//!
//! This module contains all data structures exchanged with the platform API

pub mod event;
pub mod page;
pub mod refund;
pub mod registration;
pub mod reminder;
pub mod user;

// Re-export commonly used models
pub use event::{
    Category, CreateEventRequest, Event, EventFilters, EventStatus, PlaceType, SessionType, Tag,
    TicketType, UpdateEventRequest,
};
pub use page::{Page, Pagination};
pub use refund::{RefundDecision, RefundFilters, RefundRequest, RefundStatus};
pub use registration::{
    GuestDetails, PaymentStatus, Registration, RegistrationFilters, RegistrationRequest,
    RegistrationStatus,
};
pub use reminder::{
    Audience, CreateReminderRequest, CustomReminder, ReminderStatus, SendMode, UpdateReminderRequest,
};
pub use user::{LoginRequest, LoginResponse, Role, TokenPair, User};
