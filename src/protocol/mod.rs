// Protocol module: event types, wire projections, and room code generation

pub mod messages;
pub mod room_codes;
pub mod types;

// From messages
pub use messages::{ClientMessage, ServerMessage, SessionRestoredPayload};

// From types
pub use types::{
    Category, CategoryScore, ConnectionId, GameSettings, Phase, PlayerId, PlayerPrivateState,
    PlayerPublicInfo, PlayerRoundResult, PublicGameState, PublicRoomEntry, PublicRoomSettings,
    RoomSnapshot, SettingsPatch, StandingsEntry,
};
