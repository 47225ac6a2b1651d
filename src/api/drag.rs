//! Drag gesture over the booking board.
//!
//! A gesture starts on an available pet or on a board card and ends on a
//! column. Dropping an available pet creates its booking, dropping a card on
//! another column updates the booking status. The controller is a plain
//! value: the front keeps it in the cookie session between the two requests.

use derive_more::{Display, Error};
use log::{error, warn};
use serde::{Deserialize, Serialize};

use super::board::{self, StatusBoard};
use crate::{
    consts, metric,
    models::booking::{Booking, BookingStatus, NewBooking},
    repo,
};

/// Where the dragged card was picked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragOrigin {
    Available,
    Column(BookingStatus),
}

/// Pet id when picked from the available pool, booking id otherwise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraggedCard {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        card: DraggedCard,
        origin: DragOrigin,
    },
    /// Persistence in flight
    Dropping,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    Created(Booking),
    Moved {
        booking_id: i64,
        from: BookingStatus,
        to: BookingStatus,
    },
    Unchanged,
}

#[derive(Debug, Display, Error, PartialEq)]
pub enum DragError {
    #[display("a card is already being dragged")]
    AlreadyDragging,
    #[display("no card is being dragged")]
    NotDragging,
    #[display("{_0} already has a booking")]
    PetAlreadyBooked(#[error(not(source))] String),
    #[display("{_0} is no longer registered")]
    PetNotFound(#[error(not(source))] String),
    #[display("Error loading board: {_0}")]
    BoardUnavailable(#[error(not(source))] String),
    #[display("Error creating booking: {_0}")]
    CreateFailed(#[error(not(source))] String),
    #[display("Error updating booking: {_0}")]
    MoveFailed(#[error(not(source))] String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == DragState::Idle
    }

    pub fn begin_drag(&mut self, card: DraggedCard, origin: DragOrigin) -> Result<(), DragError> {
        if let DragState::Dragging { .. } = self.state {
            return Err(DragError::AlreadyDragging);
        }

        self.state = DragState::Dragging { card, origin };
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Resolves the held gesture on `target`.
    ///
    /// `board` must be a fresh snapshot: a pet dropped from the available
    /// pool is rejected when it already has a booking there. The controller
    /// is back to idle once this returns, whatever the outcome.
    pub async fn drop_on(
        &mut self,
        target: BookingStatus,
        board: &mut StatusBoard,
        repo: &repo::ImplAppRepo,
    ) -> Result<DropOutcome, DragError> {
        let DragState::Dragging { card, origin } =
            std::mem::replace(&mut self.state, DragState::Dropping)
        else {
            self.state = DragState::Idle;
            return Err(DragError::NotDragging);
        };

        let outcome = match origin {
            DragOrigin::Available => create_booking(card, target, board, repo).await,
            DragOrigin::Column(from) if from == target => Ok(DropOutcome::Unchanged),
            DragOrigin::Column(from) => move_booking(card, from, target, board, repo).await,
        };

        self.state = DragState::Idle;
        outcome
    }
}

async fn create_booking(
    card: DraggedCard,
    target: BookingStatus,
    board: &StatusBoard,
    repo: &repo::ImplAppRepo,
) -> Result<DropOutcome, DragError> {
    let _span = logfire::span!("create_booking for pet {pet_id}", pet_id = card.id).entered();

    let pet_name = match board.available_pet(card.id) {
        Some(pet) => pet.name.clone(),
        None if board.booked_pet_ids().contains(&card.id) => {
            return Err(DragError::PetAlreadyBooked(card.name));
        }
        None => return Err(DragError::PetNotFound(card.name)),
    };

    let booking = NewBooking {
        pet_id: Some(card.id),
        pet_name,
        service_type: consts::DEFAULT_SERVICE_TYPE.into(),
        task_description: consts::DEFAULT_TASK_DESCRIPTION.into(),
        status: target,
    };

    match repo.insert_booking(&booking).await {
        Ok(created) => {
            metric::incr_board_action_statds("create_booking");
            Ok(DropOutcome::Created(created))
        }
        Err(e) => {
            error!("booking for pet {} couldn't be created: {e}", card.id);
            Err(DragError::CreateFailed(e.to_string()))
        }
    }
}

async fn move_booking(
    card: DraggedCard,
    from: BookingStatus,
    to: BookingStatus,
    board: &mut StatusBoard,
    repo: &repo::ImplAppRepo,
) -> Result<DropOutcome, DragError> {
    let _span = logfire::span!("move_booking {booking_id}", booking_id = card.id).entered();

    if !board.move_card(card.id, from, to) {
        warn!("booking {} not found under {from}, updating it anyway", card.id);
    }

    match repo.update_booking_status(card.id, to).await {
        Ok(()) => {
            metric::incr_board_action_statds("move_booking");
            Ok(DropOutcome::Moved {
                booking_id: card.id,
                from,
                to,
            })
        }
        Err(e) => {
            error!("booking {} couldn't be moved to {to}: {e}", card.id);
            Err(DragError::MoveFailed(e.to_string()))
        }
    }
}

/// Result of a drop and the board to show afterwards
pub struct SettledDrop {
    pub outcome: Result<DropOutcome, DragError>,
    pub board: StatusBoard,
}

/// Drops on `target` against a fresh board and refetches the board once
/// any request was issued, so a failed optimistic move is rolled back.
pub async fn drop_and_refetch(
    controller: &mut DragController,
    target: BookingStatus,
    repo: &repo::ImplAppRepo,
) -> SettledDrop {
    let mut snapshot = match board::load_board(repo).await {
        Ok(board) => board,
        Err(e) => {
            controller.cancel();
            error!("board couldn't be loaded before the drop: {e}");
            return SettledDrop {
                outcome: Err(DragError::BoardUnavailable(e.to_string())),
                board: StatusBoard::default(),
            };
        }
    };

    let outcome = controller.drop_on(target, &mut snapshot, repo).await;

    let issued_request = matches!(
        outcome,
        Ok(DropOutcome::Created(_) | DropOutcome::Moved { .. })
            | Err(DragError::CreateFailed(_) | DragError::MoveFailed(_))
    );

    if issued_request {
        match board::load_board(repo).await {
            Ok(fresh) => snapshot = fresh,
            Err(e) => warn!("board couldn't be refetched after the drop: {e}"),
        }
    }

    SettledDrop {
        outcome,
        board: snapshot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::pet::{Pet, PetOrder},
        repo::MockAppRepo,
    };
    use mockall::predicate::eq;
    use std::sync::{Arc, Mutex};

    fn pet(id: i64, name: &str) -> Pet {
        Pet {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    fn booking(id: i64, pet_id: i64, status: BookingStatus) -> Booking {
        Booking {
            id,
            pet_id: Some(pet_id),
            pet_name: format!("pet-{pet_id}"),
            service_type: "Daycare".into(),
            task_description: "Walk".into(),
            status: status.key().into(),
            created_at: None,
        }
    }

    fn card(id: i64, name: &str) -> DraggedCard {
        DraggedCard {
            id,
            name: name.into(),
        }
    }

    /// Repo backed by a shared bookings table so refetches see mutations
    fn table_repo(pets: Vec<Pet>, bookings: Vec<Booking>) -> (MockAppRepo, Arc<Mutex<Vec<Booking>>>) {
        let table = Arc::new(Mutex::new(bookings));
        let mut mock_repo = MockAppRepo::new();

        mock_repo
            .expect_get_pets()
            .with(eq(PetOrder::IdAsc))
            .returning(move |_| Ok(pets.clone()));

        let reader = table.clone();
        mock_repo
            .expect_get_bookings()
            .returning(move || Ok(reader.lock().unwrap().clone()));

        (mock_repo, table)
    }

    #[test]
    fn test_second_drag_is_rejected() {
        let mut controller = DragController::default();

        controller
            .begin_drag(card(1, "Luna"), DragOrigin::Available)
            .unwrap();

        assert_eq!(
            controller.begin_drag(card(2, "Thor"), DragOrigin::Available),
            Err(DragError::AlreadyDragging)
        );
        assert_eq!(
            controller.state(),
            &DragState::Dragging {
                card: card(1, "Luna"),
                origin: DragOrigin::Available
            }
        );

        controller.cancel();
        assert!(controller.is_idle());
    }

    #[test]
    fn test_state_survives_session_round_trip() {
        let mut controller = DragController::default();
        controller
            .begin_drag(card(10, "Luna"), DragOrigin::Column(BookingStatus::NapTime))
            .unwrap();

        let stored = serde_json::to_string(&controller).unwrap();
        let restored: DragController = serde_json::from_str(&stored).unwrap();

        assert_eq!(restored, controller);
    }

    #[ntex::test]
    async fn test_drop_while_idle_issues_nothing() {
        let mock_repo: repo::ImplAppRepo = Box::new(MockAppRepo::new());
        let mut controller = DragController::default();
        let mut board = StatusBoard::default();

        let result = controller
            .drop_on(BookingStatus::Ready, &mut board, &mock_repo)
            .await;

        assert_eq!(result, Err(DragError::NotDragging));
        assert!(controller.is_idle());
    }

    #[ntex::test]
    async fn test_move_between_columns_updates_once() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_update_booking_status()
            .with(eq(10), eq(BookingStatus::Grooming))
            .times(1)
            .returning(|_, _| Ok(()));
        mock_repo.expect_insert_booking().times(0);

        let mock_repo: repo::ImplAppRepo = Box::new(mock_repo);
        let mut board = StatusBoard::project(
            &[pet(1, "Luna")],
            &[booking(10, 1, BookingStatus::CheckIn)],
        );
        let mut controller = DragController::default();
        controller
            .begin_drag(card(10, "Luna"), DragOrigin::Column(BookingStatus::CheckIn))
            .unwrap();

        let result = controller
            .drop_on(BookingStatus::Grooming, &mut board, &mock_repo)
            .await;

        assert_eq!(
            result,
            Ok(DropOutcome::Moved {
                booking_id: 10,
                from: BookingStatus::CheckIn,
                to: BookingStatus::Grooming
            })
        );
        assert_eq!(board.column(BookingStatus::Grooming).len(), 1);
        assert!(controller.is_idle());
    }

    #[ntex::test]
    async fn test_drop_on_origin_issues_nothing() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo.expect_update_booking_status().times(0);
        mock_repo.expect_insert_booking().times(0);

        let mock_repo: repo::ImplAppRepo = Box::new(mock_repo);
        let mut board =
            StatusBoard::project(&[], &[booking(10, 1, BookingStatus::Playtime)]);
        let mut controller = DragController::default();
        controller
            .begin_drag(card(10, "Luna"), DragOrigin::Column(BookingStatus::Playtime))
            .unwrap();

        let result = controller
            .drop_on(BookingStatus::Playtime, &mut board, &mock_repo)
            .await;

        assert_eq!(result, Ok(DropOutcome::Unchanged));
        assert!(controller.is_idle());
    }

    #[ntex::test]
    async fn test_available_pet_creates_one_booking() {
        let (mut mock_repo, table) = table_repo(vec![pet(1, "Luna")], vec![]);

        let writer = table.clone();
        mock_repo
            .expect_insert_booking()
            .withf(|b: &NewBooking| {
                b.pet_id == Some(1)
                    && b.pet_name == "Luna"
                    && b.status == BookingStatus::NapTime
                    && b.service_type == "Daycare"
                    && b.task_description == "New booking"
            })
            .times(1)
            .returning(move |b| {
                let created = Booking {
                    id: 42,
                    pet_id: b.pet_id,
                    pet_name: b.pet_name.clone(),
                    service_type: b.service_type.clone(),
                    task_description: b.task_description.clone(),
                    status: b.status.key().into(),
                    created_at: None,
                };
                writer.lock().unwrap().push(created.clone());
                Ok(created)
            });
        mock_repo.expect_update_booking_status().times(0);

        let mock_repo: repo::ImplAppRepo = Box::new(mock_repo);
        let mut controller = DragController::default();
        controller
            .begin_drag(card(1, "Luna"), DragOrigin::Available)
            .unwrap();

        let settled = drop_and_refetch(&mut controller, BookingStatus::NapTime, &mock_repo).await;

        assert!(matches!(settled.outcome, Ok(DropOutcome::Created(ref b)) if b.id == 42));
        assert!(settled.board.available.is_empty());
        assert_eq!(
            settled
                .board
                .column(BookingStatus::NapTime)
                .iter()
                .map(|c| c.booking_id)
                .collect::<Vec<i64>>(),
            vec![42]
        );
        assert!(controller.is_idle());
    }

    #[ntex::test]
    async fn test_already_booked_pet_is_rejected() {
        let (mut mock_repo, _) = table_repo(
            vec![pet(1, "Luna")],
            vec![booking(3, 1, BookingStatus::Ready)],
        );
        mock_repo.expect_insert_booking().times(0);

        let mock_repo: repo::ImplAppRepo = Box::new(mock_repo);
        let mut controller = DragController::default();
        controller
            .begin_drag(card(1, "Luna"), DragOrigin::Available)
            .unwrap();

        let settled = drop_and_refetch(&mut controller, BookingStatus::CheckIn, &mock_repo).await;

        assert_eq!(
            settled.outcome,
            Err(DragError::PetAlreadyBooked("Luna".into()))
        );
        assert!(controller.is_idle());
    }

    #[ntex::test]
    async fn test_deleted_pet_is_reported_missing() {
        let (mut mock_repo, _) = table_repo(
            vec![pet(2, "Thor")],
            vec![booking(3, 2, BookingStatus::Ready)],
        );
        mock_repo.expect_insert_booking().times(0);

        let mock_repo: repo::ImplAppRepo = Box::new(mock_repo);
        let mut controller = DragController::default();
        controller
            .begin_drag(card(1, "Luna"), DragOrigin::Available)
            .unwrap();

        let settled = drop_and_refetch(&mut controller, BookingStatus::CheckIn, &mock_repo).await;

        assert_eq!(settled.outcome, Err(DragError::PetNotFound("Luna".into())));
        assert!(settled.outcome.is_err_and(|e| e.to_string() == "Luna is no longer registered"));
        assert!(controller.is_idle());
    }

    #[ntex::test]
    async fn test_unreachable_board_is_reported_before_the_drop() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_pets()
            .returning(|_| Err(anyhow::anyhow!("connection refused")));
        mock_repo.expect_get_bookings().returning(|| Ok(vec![]));
        mock_repo.expect_insert_booking().times(0);
        mock_repo.expect_update_booking_status().times(0);

        let mock_repo: repo::ImplAppRepo = Box::new(mock_repo);
        let mut controller = DragController::default();
        controller
            .begin_drag(card(1, "Luna"), DragOrigin::Available)
            .unwrap();

        let settled = drop_and_refetch(&mut controller, BookingStatus::CheckIn, &mock_repo).await;

        assert_eq!(
            settled.outcome,
            Err(DragError::BoardUnavailable("connection refused".into()))
        );
        assert!(settled.outcome.is_err_and(|e| e.to_string().starts_with("Error loading board")));
        assert!(controller.is_idle());
    }

    #[ntex::test]
    async fn test_failed_move_is_rolled_back_by_refetch() {
        let (mut mock_repo, _) = table_repo(
            vec![pet(1, "Luna")],
            vec![booking(10, 1, BookingStatus::CheckIn)],
        );
        mock_repo
            .expect_update_booking_status()
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("permission denied")));

        let mock_repo: repo::ImplAppRepo = Box::new(mock_repo);
        let mut controller = DragController::default();
        controller
            .begin_drag(card(10, "Luna"), DragOrigin::Column(BookingStatus::CheckIn))
            .unwrap();

        let settled = drop_and_refetch(&mut controller, BookingStatus::Ready, &mock_repo).await;

        assert_eq!(
            settled.outcome,
            Err(DragError::MoveFailed("permission denied".into()))
        );
        assert_eq!(settled.board.column(BookingStatus::CheckIn).len(), 1);
        assert!(settled.board.column(BookingStatus::Ready).is_empty());
        assert!(controller.is_idle());
    }

    #[ntex::test]
    async fn test_failed_creation_is_surfaced() {
        let (mut mock_repo, _) = table_repo(vec![pet(1, "Luna")], vec![]);
        mock_repo
            .expect_insert_booking()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("insert rejected")));

        let mock_repo: repo::ImplAppRepo = Box::new(mock_repo);
        let mut controller = DragController::default();
        controller
            .begin_drag(card(1, "Luna"), DragOrigin::Available)
            .unwrap();

        let settled = drop_and_refetch(&mut controller, BookingStatus::CheckIn, &mock_repo).await;

        assert!(settled.outcome.is_err_and(|e| {
            e.to_string() == "Error creating booking: insert rejected"
        }));
        assert_eq!(settled.board.available.len(), 1);
    }
}
