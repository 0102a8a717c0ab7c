//! Scripted in-memory stand-in for the reservation service (unit tests only).

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use shared::{
    AuthResponse, CreateReservationRequest, ForgotPasswordRequest, LoginRequest, MessageResponse,
    RegisterRequest, Reservation, ReservationSlot, ResetPasswordRequest, Restaurant, Role,
    UserInfo,
};

use crate::error::{ClientError, ClientResult};
use crate::http::ReservationApi;

pub fn plain_user() -> UserInfo {
    UserInfo {
        id: "u-ada".into(),
        name: "Ada".into(),
        email: "ada@example.com".into(),
        role: Role::User,
    }
}

pub fn admin_user() -> UserInfo {
    UserInfo {
        id: "u-root".into(),
        name: "Root".into(),
        email: "root@example.com".into(),
        role: Role::Admin,
    }
}

fn slot(id: &str, hour: u32, capacity: u32) -> ReservationSlot {
    ReservationSlot {
        id: id.into(),
        date: Utc.with_ymd_and_hms(2026, 11, 2, hour, 0, 0).unwrap(),
        capacity,
    }
}

pub fn sample_restaurants() -> Vec<Restaurant> {
    vec![
        Restaurant {
            id: "r-italy".into(),
            name: "Little Italy".into(),
            location: "Downtown".into(),
            cuisine: "Italian".into(),
            description: "Handmade pasta".into(),
            image_ref: None,
            slots: vec![slot("s-italy-19", 19, 4), slot("s-italy-21", 21, 0)],
            admin_id: Some("u-root".into()),
        },
        Restaurant {
            id: "r-taco".into(),
            name: "Taqueria Sol".into(),
            location: "Mission".into(),
            cuisine: "Mexican".into(),
            description: "Street tacos".into(),
            image_ref: Some("https://img.example.com/taco.jpg".into()),
            slots: vec![slot("s-taco-18", 18, 10)],
            admin_id: Some("u-root".into()),
        },
        Restaurant {
            id: "r-dragon".into(),
            name: "Golden Dragon".into(),
            location: "Little Italy".into(),
            cuisine: "Chinese".into(),
            description: "Dim sum".into(),
            image_ref: None,
            slots: Vec::new(),
            admin_id: None,
        },
    ]
}

fn rejected(status: u16, message: Option<&str>) -> ClientError {
    ClientError::Api {
        status,
        message: message.map(str::to_string),
    }
}

fn offline() -> ClientError {
    ClientError::InvalidResponse("connection refused".into())
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
    pub auth: usize,
    pub listing: usize,
    pub detail: usize,
    pub reservation: usize,
    pub profile: usize,
}

/// One scripted answer for `list_restaurants`. `None` fails with a 500.
type ListingStep = (Duration, Option<Vec<Restaurant>>);

pub struct FakeApi {
    accounts: Mutex<HashMap<String, (String, UserInfo)>>,
    restaurants: Mutex<Vec<Restaurant>>,
    listing_script: Mutex<VecDeque<ListingStep>>,
    auth_delay: Mutex<Duration>,
    reservation_delay: Mutex<Duration>,
    transport_down: AtomicBool,
    auth_calls: AtomicUsize,
    listing_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    reservation_calls: AtomicUsize,
    profile_calls: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            restaurants: Mutex::new(sample_restaurants()),
            listing_script: Mutex::new(VecDeque::new()),
            auth_delay: Mutex::new(Duration::ZERO),
            reservation_delay: Mutex::new(Duration::ZERO),
            transport_down: AtomicBool::new(false),
            auth_calls: AtomicUsize::new(0),
            listing_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
            reservation_calls: AtomicUsize::new(0),
            profile_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_account(self, email: &str, password: &str, user: UserInfo) -> Self {
        self.accounts
            .lock()
            .unwrap()
            .insert(email.to_string(), (password.to_string(), user));
        self
    }

    pub fn with_auth_delay(self, delay: Duration) -> Self {
        *self.auth_delay.lock().unwrap() = delay;
        self
    }

    pub fn remove_account(&self, email: &str) {
        self.accounts.lock().unwrap().remove(email);
    }

    pub fn with_reservation_delay(self, delay: Duration) -> Self {
        *self.reservation_delay.lock().unwrap() = delay;
        self
    }

    pub fn fail_transport(&self, down: bool) {
        self.transport_down.store(down, Ordering::SeqCst);
    }

    pub fn script_listing(&self, delay: Duration, response: Option<Vec<Restaurant>>) {
        self.listing_script
            .lock()
            .unwrap()
            .push_back((delay, response));
    }

    pub fn calls(&self) -> CallCounts {
        CallCounts {
            auth: self.auth_calls.load(Ordering::SeqCst),
            listing: self.listing_calls.load(Ordering::SeqCst),
            detail: self.detail_calls.load(Ordering::SeqCst),
            reservation: self.reservation_calls.load(Ordering::SeqCst),
            profile: self.profile_calls.load(Ordering::SeqCst),
        }
    }

    fn check_transport(&self) -> ClientResult<()> {
        if self.transport_down.load(Ordering::SeqCst) {
            return Err(offline());
        }
        Ok(())
    }

    fn user_for_token(&self, token: &str) -> Option<UserInfo> {
        let id = token.strip_prefix("token-")?;
        self.accounts
            .lock()
            .unwrap()
            .values()
            .find(|(_, user)| user.id == id)
            .map(|(_, user)| user.clone())
    }
}

impl Default for FakeApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReservationApi for FakeApi {
    async fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.auth_delay.lock().unwrap();
        tokio::task::yield_now().await;
        tokio::time::sleep(delay).await;
        self.check_transport()?;

        let accounts = self.accounts.lock().unwrap();
        match accounts.get(&request.email) {
            Some((password, user)) if *password == request.password => Ok(AuthResponse {
                user: user.clone(),
                token: format!("token-{}", user.id),
            }),
            _ => Err(rejected(401, Some("Invalid credentials"))),
        }
    }

    async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.auth_delay.lock().unwrap();
        tokio::task::yield_now().await;
        tokio::time::sleep(delay).await;
        self.check_transport()?;

        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(&request.email) {
            return Err(rejected(400, Some("Email already registered")));
        }
        let user = UserInfo {
            id: format!("u-{}", accounts.len() + 1),
            name: request.name.clone(),
            email: request.email.clone(),
            role: request.role.clone(),
        };
        accounts.insert(
            request.email.clone(),
            (request.password.clone(), user.clone()),
        );
        Ok(AuthResponse {
            token: format!("token-{}", user.id),
            user,
        })
    }

    async fn forgot_password(
        &self,
        request: &ForgotPasswordRequest,
    ) -> ClientResult<MessageResponse> {
        self.check_transport()?;
        if self.accounts.lock().unwrap().contains_key(&request.email) {
            Ok(MessageResponse {
                message: "Password reset email sent".into(),
            })
        } else {
            Err(rejected(404, Some("User not found")))
        }
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> ClientResult<MessageResponse> {
        self.check_transport()?;
        if request.reset_token == "reset-ok" {
            Ok(MessageResponse {
                message: "Password has been reset".into(),
            })
        } else {
            Err(rejected(400, None))
        }
    }

    async fn list_restaurants(&self) -> ClientResult<Vec<Restaurant>> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        let step = self.listing_script.lock().unwrap().pop_front();
        match step {
            Some((delay, response)) => {
                tokio::time::sleep(delay).await;
                response.ok_or_else(|| rejected(500, None))
            }
            None => {
                tokio::task::yield_now().await;
                self.check_transport()?;
                Ok(self.restaurants.lock().unwrap().clone())
            }
        }
    }

    async fn get_restaurant(&self, id: &str) -> ClientResult<Restaurant> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.check_transport()?;
        self.restaurants
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| rejected(404, Some("Restaurant not found")))
    }

    async fn create_reservation(
        &self,
        token: &str,
        request: &CreateReservationRequest,
    ) -> ClientResult<Reservation> {
        let n = self.reservation_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = *self.reservation_delay.lock().unwrap();
        tokio::task::yield_now().await;
        tokio::time::sleep(delay).await;
        self.check_transport()?;

        if self.user_for_token(token).is_none() {
            return Err(rejected(401, Some("Invalid token")));
        }

        let restaurants = self.restaurants.lock().unwrap();
        let slot = restaurants
            .iter()
            .find(|r| r.id == request.restaurant)
            .and_then(|r| r.slots.iter().find(|s| s.date == request.date));
        match slot {
            None => Err(rejected(404, Some("Slot not found"))),
            Some(slot) if slot.capacity == 0 => {
                Err(rejected(409, Some("No seats left for this slot")))
            }
            Some(_) => Ok(Reservation {
                id: format!("res-{n}"),
                date: Some(request.date),
                status: Some(request.status.to_string()),
                user: Some(serde_json::Value::String(request.user.clone())),
                restaurant: Some(serde_json::Value::String(request.restaurant.clone())),
            }),
        }
    }

    async fn get_user(&self, token: &str, id: &str) -> ClientResult<UserInfo> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.check_transport()?;
        match self.user_for_token(token) {
            Some(user) if user.id == id => Ok(user),
            Some(_) => Err(rejected(403, Some("Forbidden"))),
            None => Err(rejected(401, None)),
        }
    }
}
