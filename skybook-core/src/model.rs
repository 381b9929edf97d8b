use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Distinguishes a patch field set to `null` (clear it) from one that is
/// absent (leave it unchanged).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Country calling codes accepted at registration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CountryCode {
    #[serde(rename = "91")]
    India,
    #[serde(rename = "44")]
    UnitedKingdom,
}

impl Default for CountryCode {
    fn default() -> Self {
        CountryCode::India
    }
}

impl std::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CountryCode::India => write!(f, "+91"),
            CountryCode::UnitedKingdom => write!(f, "+44"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeatType {
    Aisle,
    Window,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeatPreference {
    Double,
    Triple,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GovernmentIdType {
    Adhaar,
    DrivingLicense,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    Upi,
    NetBanking,
    BankTransfer,
}

/// Stored user record. The password hash never serializes into responses.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct User {
    pub mobile_number: i64,
    pub email: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub address: String,
    pub country_code: CountryCode,
    pub dob: Option<NaiveDate>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Create payload for a user; the only place a plaintext password appears.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub mobile_number: i64,
    pub email: String,
    pub password: String,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub address: String,
    #[serde(default)]
    pub country_code: CountryCode,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub middle_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub last_name: Option<Option<String>>,
    pub address: Option<String>,
    pub country_code: Option<CountryCode>,
    #[serde(default, deserialize_with = "double_option")]
    pub dob: Option<Option<NaiveDate>>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

impl User {
    pub fn from_new(new: NewUser) -> Self {
        let password_hash = hash_password(&new.password);
        User {
            mobile_number: new.mobile_number,
            email: new.email,
            first_name: new.first_name,
            middle_name: new.middle_name,
            last_name: new.last_name,
            address: new.address,
            country_code: new.country_code,
            dob: new.dob,
            password_hash,
            is_staff: new.is_staff,
            is_superuser: new.is_superuser,
        }
    }

    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(password) = patch.password {
            self.password_hash = hash_password(&password);
        }
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(middle_name) = patch.middle_name {
            self.middle_name = middle_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(country_code) = patch.country_code {
            self.country_code = country_code;
        }
        if let Some(dob) = patch.dob {
            self.dob = dob;
        }
        if let Some(is_staff) = patch.is_staff {
            self.is_staff = is_staff;
        }
        if let Some(is_superuser) = patch.is_superuser {
            self.is_superuser = is_superuser;
        }
    }
}

pub fn hash_password(plain: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plain.as_bytes());
    hex::encode(hasher.finalize())
}

/// Flight record; the client supplies the identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flight {
    pub flight_id: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub destination: String,
    pub airline_name: String,
    pub airport_location: String,
    pub no_of_seats: i32,
    pub available_seats: i32,
    pub flight_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightPatch {
    pub departure_time: Option<DateTime<Utc>>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub destination: Option<String>,
    pub airline_name: Option<String>,
    pub airport_location: Option<String>,
    pub no_of_seats: Option<i32>,
    pub available_seats: Option<i32>,
    pub flight_type: Option<String>,
}

impl Flight {
    pub fn apply(&mut self, patch: FlightPatch) {
        if let Some(departure_time) = patch.departure_time {
            self.departure_time = departure_time;
        }
        if let Some(arrival_time) = patch.arrival_time {
            self.arrival_time = arrival_time;
        }
        if let Some(duration_minutes) = patch.duration_minutes {
            self.duration_minutes = duration_minutes;
        }
        if let Some(destination) = patch.destination {
            self.destination = destination;
        }
        if let Some(airline_name) = patch.airline_name {
            self.airline_name = airline_name;
        }
        if let Some(airport_location) = patch.airport_location {
            self.airport_location = airport_location;
        }
        if let Some(no_of_seats) = patch.no_of_seats {
            self.no_of_seats = no_of_seats;
        }
        if let Some(available_seats) = patch.available_seats {
            self.available_seats = available_seats;
        }
        if let Some(flight_type) = patch.flight_type {
            self.flight_type = flight_type;
        }
    }
}

/// Seat record; belongs to exactly one flight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seat {
    pub seat_id: String,
    pub flight_id: String,
    pub cabin_class: String,
    pub type_of_seat: SeatType,
    pub seat_preference: SeatPreference,
    #[serde(default)]
    pub is_special: bool,
    #[serde(default)]
    pub special_seat_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeatPatch {
    pub flight_id: Option<String>,
    pub cabin_class: Option<String>,
    pub type_of_seat: Option<SeatType>,
    pub seat_preference: Option<SeatPreference>,
    pub is_special: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub special_seat_type: Option<Option<String>>,
}

impl Seat {
    pub fn apply(&mut self, patch: SeatPatch) {
        if let Some(flight_id) = patch.flight_id {
            self.flight_id = flight_id;
        }
        if let Some(cabin_class) = patch.cabin_class {
            self.cabin_class = cabin_class;
        }
        if let Some(type_of_seat) = patch.type_of_seat {
            self.type_of_seat = type_of_seat;
        }
        if let Some(is_special) = patch.is_special {
            self.is_special = is_special;
            if !is_special {
                self.special_seat_type = None;
            }
        }
        if let Some(seat_preference) = patch.seat_preference {
            self.seat_preference = seat_preference;
        }
        if let Some(special_seat_type) = patch.special_seat_type {
            self.special_seat_type = special_seat_type;
        }
    }
}

/// Ticket record; ties a passenger to a seat on a flight.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Ticket {
    pub ticket_id: Uuid,
    pub user_id: i64,
    pub flight_id: String,
    pub seat_id: String,
    pub pnr: String,
    pub date_of_departure: NaiveDate,
    pub fare: f64,
    pub passport_number: String,
    pub government_id_type: GovernmentIdType,
    pub government_id_number: String,
    pub health_status: String,
    pub booking_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTicket {
    pub user_id: i64,
    pub flight_id: String,
    pub seat_id: String,
    pub pnr: String,
    pub date_of_departure: NaiveDate,
    pub fare: f64,
    pub passport_number: String,
    pub government_id_type: GovernmentIdType,
    pub government_id_number: String,
    #[serde(default)]
    pub health_status: String,
    #[serde(default)]
    pub booking_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketPatch {
    pub user_id: Option<i64>,
    pub flight_id: Option<String>,
    pub seat_id: Option<String>,
    pub pnr: Option<String>,
    pub date_of_departure: Option<NaiveDate>,
    pub fare: Option<f64>,
    pub passport_number: Option<String>,
    pub government_id_type: Option<GovernmentIdType>,
    pub government_id_number: Option<String>,
    pub health_status: Option<String>,
    pub booking_date: Option<NaiveDate>,
}

impl Ticket {
    pub fn from_new(new: NewTicket) -> Self {
        Ticket {
            ticket_id: Uuid::new_v4(),
            user_id: new.user_id,
            flight_id: new.flight_id,
            seat_id: new.seat_id,
            pnr: new.pnr,
            date_of_departure: new.date_of_departure,
            fare: new.fare,
            passport_number: new.passport_number,
            government_id_type: new.government_id_type,
            government_id_number: new.government_id_number,
            health_status: new.health_status,
            booking_date: new.booking_date.unwrap_or_else(|| Utc::now().date_naive()),
        }
    }

    pub fn apply(&mut self, patch: TicketPatch) {
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
        if let Some(flight_id) = patch.flight_id {
            self.flight_id = flight_id;
        }
        if let Some(seat_id) = patch.seat_id {
            self.seat_id = seat_id;
        }
        if let Some(pnr) = patch.pnr {
            self.pnr = pnr;
        }
        if let Some(date_of_departure) = patch.date_of_departure {
            self.date_of_departure = date_of_departure;
        }
        if let Some(fare) = patch.fare {
            self.fare = fare;
        }
        if let Some(passport_number) = patch.passport_number {
            self.passport_number = passport_number;
        }
        if let Some(government_id_type) = patch.government_id_type {
            self.government_id_type = government_id_type;
        }
        if let Some(government_id_number) = patch.government_id_number {
            self.government_id_number = government_id_number;
        }
        if let Some(health_status) = patch.health_status {
            self.health_status = health_status;
        }
        if let Some(booking_date) = patch.booking_date {
            self.booking_date = booking_date;
        }
    }
}

/// Payment record for one ticket.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Payment {
    pub payment_id: Uuid,
    pub user_id: i64,
    pub ticket_id: Uuid,
    pub payment_mode: PaymentMode,
    pub transaction_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPayment {
    pub user_id: i64,
    pub ticket_id: Uuid,
    pub payment_mode: PaymentMode,
    pub transaction_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentPatch {
    pub user_id: Option<i64>,
    pub ticket_id: Option<Uuid>,
    pub payment_mode: Option<PaymentMode>,
    pub transaction_id: Option<String>,
}

impl Payment {
    pub fn from_new(new: NewPayment) -> Self {
        Payment {
            payment_id: Uuid::new_v4(),
            user_id: new.user_id,
            ticket_id: new.ticket_id,
            payment_mode: new.payment_mode,
            transaction_id: new.transaction_id,
        }
    }

    pub fn apply(&mut self, patch: PaymentPatch) {
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
        if let Some(ticket_id) = patch.ticket_id {
            self.ticket_id = ticket_id;
        }
        if let Some(payment_mode) = patch.payment_mode {
            self.payment_mode = payment_mode;
        }
        if let Some(transaction_id) = patch.transaction_id {
            self.transaction_id = transaction_id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_code_wire_values() {
        assert_eq!(serde_json::to_string(&CountryCode::India).unwrap(), "\"91\"");
        let code: CountryCode = serde_json::from_str("\"44\"").unwrap();
        assert_eq!(code, CountryCode::UnitedKingdom);
        assert!(serde_json::from_str::<CountryCode>("\"1\"").is_err());
        assert_eq!(CountryCode::India.to_string(), "+91");
    }

    #[test]
    fn payment_mode_rejects_unknown_value() {
        let mode: PaymentMode = serde_json::from_str("\"net_banking\"").unwrap();
        assert_eq!(mode, PaymentMode::NetBanking);
        assert!(serde_json::from_str::<PaymentMode>("\"card\"").is_err());
    }

    #[test]
    fn user_serialization_omits_password_hash() {
        let user = User::from_new(NewUser {
            mobile_number: 9876543210,
            email: "a@b.com".into(),
            password: "secret".into(),
            first_name: "Asha".into(),
            middle_name: None,
            last_name: None,
            address: "12 MG Road".into(),
            country_code: CountryCode::default(),
            dob: None,
            is_staff: false,
            is_superuser: false,
        });
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["mobile_number"], 9876543210i64);
    }

    #[test]
    fn password_is_hashed_on_create_and_patch() {
        let mut user = User::from_new(NewUser {
            mobile_number: 1,
            email: "a@b.com".into(),
            password: "secret".into(),
            first_name: "A".into(),
            middle_name: None,
            last_name: None,
            address: "x".into(),
            country_code: CountryCode::default(),
            dob: None,
            is_staff: false,
            is_superuser: false,
        });
        assert_ne!(user.password_hash, "secret");
        assert_eq!(user.password_hash, hash_password("secret"));

        let old_hash = user.password_hash.clone();
        user.apply(UserPatch {
            password: Some("rotated".into()),
            ..UserPatch::default()
        });
        assert_ne!(user.password_hash, old_hash);
        assert_eq!(user.password_hash, hash_password("rotated"));
    }

    #[test]
    fn patch_distinguishes_explicit_null_from_absent_field() {
        let patch: UserPatch = serde_json::from_str(r#"{"middle_name": null}"#).unwrap();
        assert_eq!(patch.middle_name, Some(None));
        let patch: UserPatch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch.middle_name, None);
    }

    #[test]
    fn patch_with_null_clears_optional_field() {
        let mut user = User::from_new(NewUser {
            mobile_number: 1,
            email: "a@b.com".into(),
            password: "secret".into(),
            first_name: "A".into(),
            middle_name: Some("Kumari".into()),
            last_name: None,
            address: "x".into(),
            country_code: CountryCode::default(),
            dob: NaiveDate::from_ymd_opt(1990, 4, 2),
            is_staff: false,
            is_superuser: false,
        });
        let patch: UserPatch =
            serde_json::from_str(r#"{"middle_name": null, "dob": null}"#).unwrap();
        user.apply(patch);
        assert_eq!(user.middle_name, None);
        assert_eq!(user.dob, None);

        // An absent field stays untouched
        let patch: UserPatch = serde_json::from_str(r#"{"last_name": "Rao"}"#).unwrap();
        user.apply(patch);
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.last_name, Some("Rao".into()));
    }

    #[test]
    fn seat_patch_clearing_special_flag_drops_description() {
        let mut seat = Seat {
            seat_id: "1A".into(),
            flight_id: "AI101".into(),
            cabin_class: "economy".into(),
            type_of_seat: SeatType::Window,
            seat_preference: SeatPreference::Double,
            is_special: true,
            special_seat_type: Some("bassinet".into()),
        };
        seat.apply(SeatPatch {
            is_special: Some(false),
            ..SeatPatch::default()
        });
        assert!(!seat.is_special);
        assert_eq!(seat.special_seat_type, None);
    }
}
