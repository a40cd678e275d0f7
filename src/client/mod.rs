//! Client side of the Game Day API: an HTTP gateway plus the list and form
//! controllers a front end drives.

pub mod form;
pub mod gateway;
pub mod listing;
pub mod normalize;

pub use form::{FormMode, FormStatus, GameForm, SubmitError};
pub use gateway::{GameApi, GameClient, GatewayError};
pub use listing::GameList;
pub use normalize::RemoteGame;
