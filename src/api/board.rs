//! Booking status board.
//!
//! Bookings are projected into the five [BookingStatus] columns and pets
//! without any booking row form the available pool. The backend stays the
//! source of truth: a board is rebuilt from a fresh read after every mutation.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::{
    metric,
    models::{
        booking::{Booking, BookingStatus},
        pet::{Pet, PetOrder},
    },
    repo,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoardCard {
    pub booking_id: i64,
    pub pet_id: Option<i64>,
    pub pet_name: String,
    pub task_description: String,
    pub service_type: String,
}

impl From<&Booking> for BoardCard {
    fn from(booking: &Booking) -> Self {
        Self {
            booking_id: booking.id,
            pet_id: booking.pet_id,
            pet_name: booking.pet_name.clone(),
            task_description: booking.task_description.clone(),
            service_type: booking.service_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BoardColumn {
    pub status: BookingStatus,
    pub title: &'static str,
    pub cards: Vec<BoardCard>,
}

impl BoardColumn {
    fn empty(status: BookingStatus) -> Self {
        Self {
            status,
            title: status.title(),
            cards: vec![],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailablePet {
    pub id: i64,
    pub name: String,
    pub breed: String,
    pub photo_url: Option<String>,
}

impl From<&Pet> for AvailablePet {
    fn from(pet: &Pet) -> Self {
        Self {
            id: pet.id,
            name: pet.name.clone(),
            breed: pet.breed.clone(),
            photo_url: pet.photo_url.clone(),
        }
    }
}

/// Five columns in board order plus the available pool
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusBoard {
    pub columns: Vec<BoardColumn>,
    pub available: Vec<AvailablePet>,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self {
            columns: BookingStatus::ALL.map(BoardColumn::empty).to_vec(),
            available: vec![],
        }
    }
}

/// Pet id to the raw status of its booking.
///
/// When a pet has several bookings the one with the highest id wins.
/// Bookings without a pet are skipped.
pub fn pet_booking_status(bookings: &[Booking]) -> HashMap<i64, String> {
    let mut latest: HashMap<i64, &Booking> = HashMap::new();

    for booking in bookings {
        let Some(pet_id) = booking.pet_id else {
            continue;
        };

        latest
            .entry(pet_id)
            .and_modify(|current| {
                if booking.id > current.id {
                    *current = booking;
                }
            })
            .or_insert(booking);
    }

    latest
        .into_iter()
        .map(|(pet_id, booking)| (pet_id, booking.status.clone()))
        .collect()
}

impl StatusBoard {
    pub fn project(pets: &[Pet], bookings: &[Booking]) -> Self {
        let booked_pets = pet_booking_status(bookings);
        let mut board = Self::default();

        for booking in bookings {
            match booking.known_status() {
                Some(status) => board.columns[status.index()]
                    .cards
                    .push(BoardCard::from(booking)),
                None => warn!(
                    "booking {} has unknown status `{}`, left out of the board",
                    booking.id, booking.status
                ),
            }
        }

        board.available = pets
            .iter()
            .filter(|pet| !booked_pets.contains_key(&pet.id))
            .map(AvailablePet::from)
            .collect();

        board
    }

    pub fn column(&self, status: BookingStatus) -> &[BoardCard] {
        &self.columns[status.index()].cards
    }

    /// Column holding `booking_id` and the card itself
    pub fn find_card(&self, booking_id: i64) -> Option<(BookingStatus, &BoardCard)> {
        self.columns.iter().find_map(|column| {
            column
                .cards
                .iter()
                .find(|card| card.booking_id == booking_id)
                .map(|card| (column.status, card))
        })
    }

    pub fn available_pet(&self, pet_id: i64) -> Option<&AvailablePet> {
        self.available.iter().find(|pet| pet.id == pet_id)
    }

    /// Moves the card locally, before the backend confirms it.
    ///
    /// Returns `false` when the card is not in `from` or both columns are the same.
    pub fn move_card(&mut self, booking_id: i64, from: BookingStatus, to: BookingStatus) -> bool {
        if from == to {
            return false;
        }

        let source = &mut self.columns[from.index()].cards;
        let Some(position) = source.iter().position(|card| card.booking_id == booking_id) else {
            return false;
        };

        let card = source.remove(position);
        self.columns[to.index()].cards.push(card);
        true
    }

    pub fn total_cards(&self) -> usize {
        self.columns.iter().map(|column| column.cards.len()).sum()
    }

    /// Pet ids shown on any column
    pub fn booked_pet_ids(&self) -> HashSet<i64> {
        self.columns
            .iter()
            .flat_map(|column| column.cards.iter().filter_map(|card| card.pet_id))
            .collect()
    }
}

/// Reads pets and bookings and projects them
pub async fn load_board(repo: &repo::ImplAppRepo) -> anyhow::Result<StatusBoard> {
    let _span = logfire::span!("load_board").entered();

    let (pets, bookings) =
        futures::try_join!(repo.get_pets(PetOrder::IdAsc), repo.get_bookings())?;

    Ok(StatusBoard::project(&pets, &bookings))
}

pub async fn delete_booking(booking_id: i64, repo: &repo::ImplAppRepo) -> anyhow::Result<()> {
    let _span = logfire::span!("delete_booking {booking_id}", booking_id = booking_id).entered();

    repo.delete_booking(booking_id).await?;
    metric::incr_board_action_statds("delete_booking");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::MockAppRepo;
    use mockall::predicate::eq;

    pub(crate) fn pet(id: i64, name: &str) -> Pet {
        Pet {
            id,
            name: name.into(),
            breed: "Mixed".into(),
            age: "2 years".into(),
            status: "Active".into(),
            cuteness_level: 90,
            ..Default::default()
        }
    }

    pub(crate) fn booking(id: i64, pet_id: Option<i64>, status: &str) -> Booking {
        Booking {
            id,
            pet_id,
            pet_name: format!("pet-{}", pet_id.unwrap_or_default()),
            service_type: "Daycare".into(),
            task_description: "Walk".into(),
            status: status.into(),
            created_at: None,
        }
    }

    fn booking_ids(board: &StatusBoard, status: BookingStatus) -> Vec<i64> {
        board
            .column(status)
            .iter()
            .map(|card| card.booking_id)
            .collect()
    }

    fn available_ids(board: &StatusBoard) -> Vec<i64> {
        board.available.iter().map(|pet| pet.id).collect()
    }

    #[test]
    fn test_no_bookings_every_pet_available() {
        let board = StatusBoard::project(&[pet(1, "Luna")], &[]);

        assert_eq!(available_ids(&board), vec![1]);
        assert_eq!(board.total_cards(), 0);
        assert_eq!(board.columns.len(), 5);
    }

    #[test]
    fn test_booked_pet_leaves_available_pool() {
        let board = StatusBoard::project(&[pet(1, "Luna")], &[booking(10, Some(1), "playtime")]);

        assert!(board.available.is_empty());
        assert_eq!(booking_ids(&board, BookingStatus::Playtime), vec![10]);
        assert!(board.available_pet(1).is_none());
    }

    #[test]
    fn test_unknown_status_is_left_out_but_pet_stays_booked() {
        let pets = [pet(1, "Luna"), pet(2, "Thor")];
        let bookings = [booking(10, Some(1), "boarding"), booking(11, Some(2), "ready")];

        let board = StatusBoard::project(&pets, &bookings);

        assert_eq!(board.total_cards(), 1);
        assert!(board.find_card(10).is_none());
        assert_eq!(board.find_card(11).map(|(s, _)| s), Some(BookingStatus::Ready));
        assert!(board.available.is_empty());
    }

    #[test]
    fn test_each_known_booking_in_exactly_one_column() {
        let bookings = BookingStatus::ALL
            .iter()
            .enumerate()
            .map(|(i, status)| booking(i as i64 + 1, Some(i as i64 + 1), status.key()))
            .collect::<Vec<Booking>>();

        let board = StatusBoard::project(&[], &bookings);

        for (i, status) in BookingStatus::ALL.iter().enumerate() {
            assert_eq!(booking_ids(&board, *status), vec![i as i64 + 1]);
        }
        assert_eq!(board.total_cards(), bookings.len());
    }

    #[test]
    fn test_available_independent_of_booking_order() {
        let pets = [pet(1, "Luna"), pet(2, "Thor"), pet(3, "Amora"), pet(4, "Bob")];
        let mut bookings = vec![
            booking(7, Some(3), "napTime"),
            booking(8, Some(1), "checkIn"),
            booking(9, None, "ready"),
        ];

        let board = StatusBoard::project(&pets, &bookings);
        bookings.reverse();
        let reversed = StatusBoard::project(&pets, &bookings);

        assert_eq!(available_ids(&board), vec![2, 4]);
        assert_eq!(available_ids(&reversed), vec![2, 4]);
    }

    #[test]
    fn test_cards_keep_booking_order_in_column() {
        let bookings = [
            booking(5, Some(1), "grooming"),
            booking(2, Some(2), "grooming"),
            booking(9, Some(3), "grooming"),
        ];

        let board = StatusBoard::project(&[], &bookings);

        assert_eq!(booking_ids(&board, BookingStatus::Grooming), vec![5, 2, 9]);
    }

    #[test]
    fn test_duplicated_pet_bookings_are_separate_cards() {
        let bookings = [booking(3, Some(1), "checkIn"), booking(4, Some(1), "ready")];

        let board = StatusBoard::project(&[pet(1, "Luna")], &bookings);

        assert_eq!(board.total_cards(), 2);
        assert_eq!(board.booked_pet_ids(), HashSet::from([1]));
    }

    #[test]
    fn test_pet_booking_status_highest_id_wins() {
        let bookings = [
            booking(4, Some(1), "ready"),
            booking(3, Some(1), "checkIn"),
            booking(5, None, "napTime"),
            booking(6, Some(2), "playtime"),
        ];

        let lookup = pet_booking_status(&bookings);

        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup[&1], "ready");
        assert_eq!(lookup[&2], "playtime");
    }

    #[test]
    fn test_move_card_between_columns() {
        let mut board = StatusBoard::project(&[], &[booking(10, Some(1), "checkIn")]);

        assert!(board.move_card(10, BookingStatus::CheckIn, BookingStatus::NapTime));
        assert!(board.column(BookingStatus::CheckIn).is_empty());
        assert_eq!(booking_ids(&board, BookingStatus::NapTime), vec![10]);

        // same column or wrong origin
        assert!(!board.move_card(10, BookingStatus::NapTime, BookingStatus::NapTime));
        assert!(!board.move_card(10, BookingStatus::CheckIn, BookingStatus::Ready));
        assert_eq!(board.total_cards(), 1);
    }

    #[test]
    fn test_available_pet_lookup() {
        let board = StatusBoard::project(&[pet(1, "Luna"), pet(2, "Thor")], &[]);

        assert_eq!(board.available_pet(2).map(|p| p.name.as_str()), Some("Thor"));
        assert!(board.available_pet(3).is_none());
    }

    #[ntex::test]
    async fn test_load_board() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_pets()
            .with(eq(PetOrder::IdAsc))
            .times(1)
            .returning(|_| Ok(vec![pet(1, "Luna"), pet(2, "Thor")]));
        mock_repo
            .expect_get_bookings()
            .times(1)
            .returning(|| Ok(vec![booking(10, Some(2), "napTime")]));

        let mock_repo: repo::ImplAppRepo = Box::new(mock_repo);
        let board = load_board(&mock_repo).await.unwrap();

        assert_eq!(available_ids(&board), vec![1]);
        assert_eq!(booking_ids(&board, BookingStatus::NapTime), vec![10]);
    }

    #[ntex::test]
    async fn test_load_board_fails_with_backend() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_pets()
            .returning(|_| Err(anyhow::anyhow!("backend is down")));
        mock_repo.expect_get_bookings().returning(|| Ok(vec![]));

        let mock_repo: repo::ImplAppRepo = Box::new(mock_repo);
        let result = load_board(&mock_repo).await;

        assert!(result.is_err_and(|e| e.to_string().contains("backend is down")));
    }

    #[ntex::test]
    async fn test_delete_booking_then_refetch() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_delete_booking()
            .with(eq(10))
            .times(1)
            .returning(|_| Ok(()));
        mock_repo
            .expect_get_pets()
            .returning(|_| Ok(vec![pet(1, "Luna")]));
        mock_repo.expect_get_bookings().returning(|| Ok(vec![]));

        let mock_repo: repo::ImplAppRepo = Box::new(mock_repo);
        delete_booking(10, &mock_repo).await.unwrap();
        let board = load_board(&mock_repo).await.unwrap();

        assert!(board.find_card(10).is_none());
        assert_eq!(available_ids(&board), vec![1]);
    }
}
