pub const MIGRATION_INIT: &str = include_str!("../../migrations/0001_init.sql");

pub const QUERY_GET_PETS_BY_ID: &str = r#"
SELECT id,name,breed,age,photo_url,cuteness_level,badges,status,created_at
FROM pets
ORDER BY id ASC;
"#;

pub const QUERY_GET_PETS_BY_NAME: &str = r#"
SELECT id,name,breed,age,photo_url,cuteness_level,badges,status,created_at
FROM pets
ORDER BY name ASC, id ASC;
"#;

pub const QUERY_GET_PETS_RECENT_FIRST: &str = r#"
SELECT id,name,breed,age,photo_url,cuteness_level,badges,status,created_at
FROM pets
ORDER BY created_at DESC, id DESC;
"#;

pub const QUERY_INSERT_PET: &str = r#"
INSERT INTO pets (
    name,breed,age,photo_url,cuteness_level,badges,status,created_at
) VALUES($1,$2,$3,$4,$5,$6,$7,$8)
RETURNING id,name,breed,age,photo_url,cuteness_level,badges,status,created_at;
"#;

pub const QUERY_GET_BOOKINGS: &str = r#"
SELECT id,pet_id,pet_name,service_type,task_description,status,created_at
FROM bookings
ORDER BY id ASC;
"#;

pub const QUERY_INSERT_BOOKING: &str = r#"
INSERT INTO bookings (
    pet_id,pet_name,service_type,task_description,status,created_at
) VALUES($1,$2,$3,$4,$5,$6)
RETURNING id,pet_id,pet_name,service_type,task_description,status,created_at;
"#;

pub const QUERY_UPDATE_BOOKING_STATUS: &str = r#"UPDATE bookings SET status=$2 WHERE id=$1;"#;

pub const QUERY_DELETE_BOOKING: &str = r#"DELETE FROM bookings WHERE id=$1;"#;

pub const QUERY_GET_PET_HEALTH_RECORDS: &str = r#"
SELECT id,pet_id,type,title,date,next_date,notes,created_at
FROM health_records
WHERE pet_id=$1
ORDER BY date DESC, id DESC;
"#;

pub const QUERY_INSERT_HEALTH_RECORD: &str = r#"
INSERT INTO health_records (
    pet_id,type,title,date,next_date,notes,created_at
) VALUES($1,$2,$3,$4,$5,$6,$7)
RETURNING id,pet_id,type,title,date,next_date,notes,created_at;
"#;

pub const QUERY_INSERT_USER_APP: &str = r#"
INSERT INTO user_app (
    id,email,password_hash,full_name,birth_date,national_id,created_at
) VALUES($1,$2,$3,$4,$5,$6,$7);
"#;

pub const QUERY_GET_USER_APP_CREDENTIALS_BY_EMAIL: &str = r#"
SELECT id,email,full_name,password_hash
FROM user_app
WHERE email=$1;
"#;

pub const QUERY_GET_USER_APP_BY_ID: &str = r#"
SELECT id,email,full_name
FROM user_app
WHERE id=$1;
"#;
