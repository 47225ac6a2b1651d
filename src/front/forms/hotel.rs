use serde::Deserialize;

use crate::{api::drag, models::booking::BookingStatus};

/// Sent when a card or an available pet is picked up
#[derive(Debug, Deserialize)]
pub struct DragStartForm {
    /// `available` or the key of the card column
    pub origin: String,
    /// Pet id for `available`, booking id otherwise
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

impl DragStartForm {
    pub fn origin(&self) -> anyhow::Result<drag::DragOrigin> {
        if self.origin == "available" {
            return Ok(drag::DragOrigin::Available);
        }

        Ok(drag::DragOrigin::Column(
            self.origin.parse::<BookingStatus>()?,
        ))
    }

    pub fn card(&self) -> drag::DraggedCard {
        drag::DraggedCard {
            id: self.id,
            name: super::trimmed(&self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(origin: &str) -> DragStartForm {
        DragStartForm {
            origin: origin.into(),
            id: 3,
            name: "Luna".into(),
        }
    }

    #[test]
    fn test_drag_origins() {
        assert_eq!(form("available").origin().unwrap(), drag::DragOrigin::Available);
        assert_eq!(
            form("napTime").origin().unwrap(),
            drag::DragOrigin::Column(BookingStatus::NapTime)
        );
        assert!(form("boarding").origin().is_err());
    }
}
