use crate::api::MapContext;
use shared::protocol::ServerEvent;
use tokio::sync::broadcast;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) api: MapContext,
    pub(crate) events: broadcast::Sender<ServerEvent>,
}
