use serde::Deserialize;

use super::trimmed;
use crate::api;

#[derive(Debug, Default, Deserialize)]
pub struct RegisterPetForm {
    pub name: String,
    pub breed: String,
    pub age: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default)]
    pub cuteness_level: String,
    #[serde(default)]
    pub badges: String,
}

impl TryFrom<RegisterPetForm> for api::pet::RegisterPetRequest {
    type Error = api::InputError;

    fn try_from(form: RegisterPetForm) -> Result<Self, Self::Error> {
        let cuteness_level = match form.cuteness_level.trim() {
            "" => None,
            level => Some(
                level
                    .parse::<i64>()
                    .map_err(|_| api::InputError::InvalidField("cuteness level"))?,
            ),
        };

        Ok(Self {
            name: trimmed(&form.name),
            breed: trimmed(&form.breed),
            age: trimmed(&form.age),
            photo_url: trimmed(&form.photo_url),
            cuteness_level,
            badges: trimmed(&form.badges),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_values_reach_the_pet_as_typed() {
        let photo_url = "https://images.unsplash.com/photo-1?w=400&h=400&fit=crop";
        let pet = api::pet::RegisterPetRequest::try_from(RegisterPetForm {
            name: " Tom & Jerry ".into(),
            breed: "Pug <3".into(),
            age: "1 year".into(),
            photo_url: photo_url.into(),
            cuteness_level: "85".into(),
            badges: "Cuddly & Calm".into(),
        })
        .unwrap()
        .into_new_pet()
        .unwrap();

        assert_eq!(pet.name, "Tom & Jerry");
        assert_eq!(pet.breed, "Pug <3");
        assert_eq!(pet.photo_url, photo_url);
        assert_eq!(pet.cuteness_level, 85);
        assert_eq!(pet.badges, vec!["Cuddly & Calm".to_string()]);
    }

    #[test]
    fn test_invalid_photo_url_is_rejected() {
        let result = api::pet::RegisterPetRequest::try_from(RegisterPetForm {
            name: "Luna".into(),
            breed: "Pug".into(),
            age: "1 year".into(),
            photo_url: "javascript:alert(1)".into(),
            ..Default::default()
        })
        .unwrap()
        .into_new_pet();

        assert_eq!(
            result.err(),
            Some(api::InputError::InvalidField("photo url"))
        );
    }

    #[test]
    fn test_cuteness_must_be_a_number() {
        let result = api::pet::RegisterPetRequest::try_from(RegisterPetForm {
            cuteness_level: "very".into(),
            ..Default::default()
        });

        assert_eq!(
            result.err(),
            Some(api::InputError::InvalidField("cuteness level"))
        );
    }
}
