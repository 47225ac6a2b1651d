use super::trimmed;
use crate::api;

#[derive(serde::Deserialize, Debug)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(serde::Deserialize, Debug)]
pub struct SignUpForm {
    pub full_name: String,
    pub birth_date: String,
    pub cpf: String,
    pub email: String,
    pub password: String,
}

impl From<SignUpForm> for api::user::SignUpRequest {
    fn from(form: SignUpForm) -> Self {
        Self {
            email: trimmed(&form.email),
            // sent as typed
            password: form.password,
            full_name: trimmed(&form.full_name),
            birth_date: trimmed(&form.birth_date),
            national_id: trimmed(&form.cpf),
        }
    }
}
