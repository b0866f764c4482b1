use log::info;

use protocol::{Contestant, PanelResponse, WallNotice};

use crate::api::GameApi;
use super::{Console, ConsoleError, ConsoleResult};

impl<A: GameApi> Console<A> {
    /// Reloads the cached roster and pushes it to every panel.
    pub(crate) async fn refresh_contestants(&mut self) -> ConsoleResult<()> {
        self.state.contestants = self.api.list_contestants().await?;
        self.broadcast(PanelResponse::Contestants(self.state.contestants.clone())).await;
        Ok(())
    }

    fn find_contestant(&self, id: u32) -> ConsoleResult<&Contestant> {
        self.state.contestants
            .iter()
            .find(|c| c.id == id)
            .ok_or(ConsoleError::ContestantNotFound(id))
    }

    pub(crate) async fn load_contestants(&mut self) -> ConsoleResult<()> {
        self.refresh_contestants().await?;
        info!("{} contestants loaded", self.state.contestants.len());
        Ok(())
    }

    pub(crate) async fn add_contestant(&mut self, name: &str, photo: Option<&str>) -> ConsoleResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConsoleError::EmptyName);
        }
        let id = self.api.create_contestant(name, photo).await?;
        info!("contestant {} added as #{}", name, id);
        self.refresh_contestants().await
    }

    pub(crate) async fn adjust_points(&mut self, id: u32, points: i32) -> ConsoleResult<()> {
        if points == 0 {
            return Err(ConsoleError::ZeroPoints);
        }
        let name = self.find_contestant(id)?.name.clone();
        let score = self.api.adjust_score(id, points).await?;
        info!("{} {:+} points, now {}", name, points, score);
        self.refresh_contestants().await
    }

    pub(crate) async fn eliminate(&mut self, id: u32) -> ConsoleResult<()> {
        let name = self.find_contestant(id)?.name.clone();
        self.api.eliminate(id).await?;
        info!("{} eliminated", name);
        self.post(WallNotice::Eliminate { name, id });
        self.refresh_contestants().await
    }

    pub(crate) async fn delete_contestant(&mut self, id: u32) -> ConsoleResult<()> {
        self.find_contestant(id)?;
        self.api.delete_contestant(id).await?;
        info!("contestant #{} deleted", id);
        self.refresh_contestants().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::console::ConsoleReq;
    use crate::console::testing::*;
    use protocol::PanelRequest;

    #[tokio::test]
    async fn contestants_are_cached_on_load() {
        let (mut console, _rx) = console_with(FakeApi::with_contestants(&[5, 15]));
        console.load_contestants().await.unwrap();
        assert_eq!(console.state.contestants.len(), 2);
        assert_eq!(console.state.contestants[1].score, 15);
    }

    #[tokio::test]
    async fn adding_needs_a_name() {
        let (mut console, _rx) = console_with(FakeApi::default());
        assert!(matches!(console.add_contestant("   ", None).await, Err(ConsoleError::EmptyName)));

        console.add_contestant(" Deniz ", Some("aGVsbG8=")).await.unwrap();
        assert_eq!(console.state.contestants.len(), 1);
        assert_eq!(console.state.contestants[0].name, "Deniz");
        assert_eq!(console.state.contestants[0].photo.as_deref(), Some("aGVsbG8="));
    }

    #[tokio::test]
    async fn zero_points_is_a_warning() {
        let (mut console, _rx) = console_with(FakeApi::with_contestants(&[5]));
        console.load_contestants().await.unwrap();
        let err = console.adjust_points(1, 0).await.unwrap_err();
        assert!(matches!(err, ConsoleError::ZeroPoints));
        assert_eq!(err.level(), protocol::NoticeLevel::Warning);
    }

    #[tokio::test]
    async fn points_are_applied_and_reloaded() {
        let (mut console, _rx) = console_with(FakeApi::with_contestants(&[5, 7]));
        console.load_contestants().await.unwrap();
        console.adjust_points(2, -3).await.unwrap();
        assert_eq!(console.state.contestants[1].score, 4);
        assert!(matches!(console.adjust_points(9, 10).await, Err(ConsoleError::ContestantNotFound(9))));
    }

    #[tokio::test]
    async fn elimination_is_announced_on_the_wall() {
        let (mut console, mut rx) = console_with(FakeApi::with_contestants(&[5, 7]));
        console.load_contestants().await.unwrap();
        console.eliminate(2).await.unwrap();
        assert!(console.state.contestants[1].eliminated);

        let frames = drain(&mut rx);
        assert_eq!(actions(&frames), vec!["eliminate"]);
        assert_eq!(frames[0]["data"]["name"], "player2");
        assert_eq!(frames[0]["data"]["id"], 2);
    }

    #[tokio::test]
    async fn deleting_drops_the_contestant() {
        let (mut console, _rx) = console_with(FakeApi::with_contestants(&[5, 7]));
        console.load_contestants().await.unwrap();
        console.delete_contestant(1).await.unwrap();
        assert_eq!(console.state.contestants.len(), 1);
        assert!(matches!(console.delete_contestant(1).await, Err(ConsoleError::ContestantNotFound(1))));
    }

    #[tokio::test]
    async fn schema_errors_order_a_reload() {
        let api = FakeApi::with_contestants(&[5]);
        api.schema_broken.store(true, Ordering::SeqCst);
        let (mut console, _rx) = console_with(api);

        let err = console.load_contestants().await.unwrap_err();
        assert!(err.needs_reload());
        assert!(console.state.contestants.is_empty());

        console.handle(ConsoleReq::PanelReq("op".to_string(), PanelRequest::LoadContestants)).await;
        assert!(console.state.contestants.is_empty());
    }
}
