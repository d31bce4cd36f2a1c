mod common;

use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

use car_rental::models::booking::{BookingExtras, BookingStatus, DateRange};
use car_rental::models::user::{Requester, UserRole};
use car_rental::utils::errors::AppError;

use common::{jan, seed_user, seed_vehicle, seed_vehicle_with, test_state};

fn range(start: u32, end: u32) -> DateRange {
    DateRange::new(jan(start, 0), jan(end, 0)).unwrap()
}

#[tokio::test]
async fn test_booking_blocks_sub_ranges_but_not_disjoint_ones() {
    let state = test_state();
    let car = seed_vehicle(&state, "Ferrari", 1000.0).await;
    let (user, _) = seed_user(&state, "ana@example.com", UserRole::User).await;
    let service = &state.booking_service;

    let (booking, vehicle) = service
        .create(car.id, user.id, jan(10, 0), jan(15, 0), BookingExtras::default())
        .await
        .unwrap();

    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.total_price, 5000.0);
    assert_eq!(vehicle.id, car.id);

    for (start, end) in [(10, 15), (11, 12), (14, 15), (9, 11), (14, 20)] {
        assert!(!service.is_available(car.id, &range(start, end)).await.unwrap());
    }
    for (start, end) in [(1, 10), (15, 20), (20, 25)] {
        assert!(service.is_available(car.id, &range(start, end)).await.unwrap());
    }
}

#[tokio::test]
async fn test_back_to_back_bookings_are_both_accepted() {
    let state = test_state();
    let car = seed_vehicle(&state, "Porsche", 300.0).await;
    let (user, _) = seed_user(&state, "ana@example.com", UserRole::User).await;
    let service = &state.booking_service;

    service
        .create(car.id, user.id, jan(1, 0), jan(4, 0), BookingExtras::default())
        .await
        .unwrap();
    service
        .create(car.id, user.id, jan(4, 0), jan(6, 0), BookingExtras::default())
        .await
        .unwrap();

    assert_eq!(service.list_for_user(user.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_overlapping_booking_is_rejected() {
    let state = test_state();
    let car = seed_vehicle(&state, "Porsche", 300.0).await;
    let (user, _) = seed_user(&state, "ana@example.com", UserRole::User).await;
    let service = &state.booking_service;

    service
        .create(car.id, user.id, jan(1, 0), jan(5, 0), BookingExtras::default())
        .await
        .unwrap();
    let result = service
        .create(car.id, user.id, jan(3, 0), jan(6, 0), BookingExtras::default())
        .await;

    assert!(matches!(result, Err(AppError::AvailabilityConflict(_))));
    assert_eq!(service.list_for_user(user.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_partial_day_is_charged_as_full_day() {
    let state = test_state();
    let car = seed_vehicle(&state, "Lamborghini", 1000.0).await;
    let (user, _) = seed_user(&state, "ana@example.com", UserRole::User).await;

    let (booking, _) = state
        .booking_service
        .create(car.id, user.id, jan(1, 0), jan(3, 12), BookingExtras::default())
        .await
        .unwrap();

    assert_eq!(booking.duration_days(), 3);
    assert_eq!(booking.total_price, 3000.0);
}

#[tokio::test]
async fn test_unrepresentable_total_is_rejected_before_insert() {
    let state = test_state();
    let car = seed_vehicle(&state, "Legacy", 1e308).await;
    let (user, _) = seed_user(&state, "ana@example.com", UserRole::User).await;
    let service = &state.booking_service;

    let result = service
        .create(car.id, user.id, jan(1, 0), jan(3, 0), BookingExtras::default())
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(service.list_for_user(user.id).await.unwrap().is_empty());
    assert!(service.is_available(car.id, &range(1, 3)).await.unwrap());
}

#[tokio::test]
async fn test_preconditions_fail_in_order() {
    let state = test_state();
    let (user, _) = seed_user(&state, "ana@example.com", UserRole::User).await;
    let service = &state.booking_service;

    // Vehículo inexistente, aunque las fechas también sean inválidas
    let result = service
        .create(Uuid::new_v4(), user.id, jan(5, 0), jan(1, 0), BookingExtras::default())
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    // Vehículo fuera de servicio antes que fechas inválidas
    let parked = seed_vehicle_with(&state, "Bentley", 800.0, |v| v.available = false).await;
    let result = service
        .create(parked.id, user.id, jan(5, 0), jan(1, 0), BookingExtras::default())
        .await;
    assert!(matches!(result, Err(AppError::AvailabilityConflict(_))));

    let car = seed_vehicle(&state, "Audi", 200.0).await;

    let result = service
        .create(car.id, user.id, jan(5, 0), jan(5, 0), BookingExtras::default())
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let now = jan(10, 0);
    let result = service
        .create_at(car.id, user.id, jan(9, 0), jan(12, 0), BookingExtras::default(), now)
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    assert!(service.list_for_user(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_extras_are_stored_but_do_not_affect_price() {
    let state = test_state();
    let car = seed_vehicle(&state, "Audi", 200.0).await;
    let (user, _) = seed_user(&state, "ana@example.com", UserRole::User).await;

    let extras = BookingExtras {
        insurance: true,
        additional_drivers: 2,
        pickup_location: "Airport".to_string(),
        dropoff_location: "Hotel".to_string(),
    };
    let (booking, _) = state
        .booking_service
        .create(car.id, user.id, jan(1, 0), jan(3, 0), extras)
        .await
        .unwrap();

    assert_eq!(booking.total_price, 400.0);
    assert!(booking.insurance);
    assert_eq!(booking.additional_drivers, 2);
    assert_eq!(booking.pickup_location, "Airport");
    assert!(!booking.is_paid);
}

#[tokio::test]
async fn test_user_status_changes() {
    let state = test_state();
    let car = seed_vehicle(&state, "Audi", 200.0).await;
    let (owner, _) = seed_user(&state, "owner@example.com", UserRole::User).await;
    let (other, _) = seed_user(&state, "other@example.com", UserRole::User).await;
    let service = &state.booking_service;

    let (booking, _) = service
        .create(car.id, owner.id, jan(1, 0), jan(3, 0), BookingExtras::default())
        .await
        .unwrap();

    let result = service
        .set_status(booking.id, &owner.requester(), BookingStatus::Completed)
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    // Ni siquiera al mismo estado
    let result = service
        .set_status(booking.id, &owner.requester(), BookingStatus::Pending)
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    let result = service
        .set_status(booking.id, &other.requester(), BookingStatus::Cancelled)
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    let unchanged = service.get(booking.id, &owner.requester()).await.unwrap();
    assert_eq!(unchanged.status, BookingStatus::Pending);

    let cancelled = service
        .set_status(booking.id, &owner.requester(), BookingStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    // Cancelar de nuevo no cambia nada
    let again = service
        .set_status(booking.id, &owner.requester(), BookingStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(again, cancelled);
}

#[tokio::test]
async fn test_missing_booking_is_not_found() {
    let state = test_state();
    let (admin, _) = seed_user(&state, "admin@example.com", UserRole::Admin).await;

    let result = state
        .booking_service
        .set_status(Uuid::new_v4(), &admin.requester(), BookingStatus::Confirmed)
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_owner_cannot_cancel_completed_booking() {
    let state = test_state();
    let car = seed_vehicle(&state, "Audi", 200.0).await;
    let (owner, _) = seed_user(&state, "owner@example.com", UserRole::User).await;
    let (admin, _) = seed_user(&state, "admin@example.com", UserRole::Admin).await;
    let service = &state.booking_service;

    let (booking, _) = service
        .create(car.id, owner.id, jan(1, 0), jan(3, 0), BookingExtras::default())
        .await
        .unwrap();
    service
        .set_status(booking.id, &admin.requester(), BookingStatus::Completed)
        .await
        .unwrap();

    let result = service
        .set_status(booking.id, &owner.requester(), BookingStatus::Cancelled)
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn test_cancelling_frees_the_interval() {
    let state = test_state();
    let car = seed_vehicle(&state, "Audi", 200.0).await;
    let (user, _) = seed_user(&state, "ana@example.com", UserRole::User).await;
    let service = &state.booking_service;

    let (first, _) = service
        .create(car.id, user.id, jan(1, 0), jan(5, 0), BookingExtras::default())
        .await
        .unwrap();
    service
        .set_status(first.id, &user.requester(), BookingStatus::Cancelled)
        .await
        .unwrap();

    service
        .create(car.id, user.id, jan(2, 0), jan(4, 0), BookingExtras::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_admin_reactivation_cannot_create_overlap() {
    let state = test_state();
    let car = seed_vehicle(&state, "Audi", 200.0).await;
    let (user, _) = seed_user(&state, "ana@example.com", UserRole::User).await;
    let (admin, _) = seed_user(&state, "admin@example.com", UserRole::Admin).await;
    let service = &state.booking_service;

    let (first, _) = service
        .create(car.id, user.id, jan(1, 0), jan(5, 0), BookingExtras::default())
        .await
        .unwrap();
    service
        .set_status(first.id, &user.requester(), BookingStatus::Cancelled)
        .await
        .unwrap();
    service
        .create(car.id, user.id, jan(3, 0), jan(6, 0), BookingExtras::default())
        .await
        .unwrap();

    let result = service
        .set_status(first.id, &admin.requester(), BookingStatus::Pending)
        .await;
    assert!(matches!(result, Err(AppError::AvailabilityConflict(_))));

    let still_cancelled = service.get(first.id, &admin.requester()).await.unwrap();
    assert_eq!(still_cancelled.status, BookingStatus::Cancelled);
}

#[tokio::test]
async fn test_admin_moves_booking_through_lifecycle() {
    let state = test_state();
    let car = seed_vehicle(&state, "Audi", 200.0).await;
    let (user, _) = seed_user(&state, "ana@example.com", UserRole::User).await;
    let (admin, _) = seed_user(&state, "admin@example.com", UserRole::Admin).await;
    let service = &state.booking_service;

    let (booking, _) = service
        .create(car.id, user.id, jan(1, 0), jan(5, 0), BookingExtras::default())
        .await
        .unwrap();

    let confirmed = service
        .set_status(booking.id, &admin.requester(), BookingStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);
    assert!(!service.is_available(car.id, &range(2, 3)).await.unwrap());

    let completed = service
        .set_status(booking.id, &admin.requester(), BookingStatus::Completed)
        .await
        .unwrap();
    assert_eq!(completed.status, BookingStatus::Completed);
    assert!(service.is_available(car.id, &range(2, 3)).await.unwrap());
}

#[tokio::test]
async fn test_repeated_reads_are_identical() {
    let state = test_state();
    let car = seed_vehicle(&state, "Audi", 200.0).await;
    let (user, _) = seed_user(&state, "ana@example.com", UserRole::User).await;
    let service = &state.booking_service;

    let (booking, _) = service
        .create(car.id, user.id, jan(1, 0), jan(5, 0), BookingExtras::default())
        .await
        .unwrap();

    let first = service.get(booking.id, &user.requester()).await.unwrap();
    let second = service.get(booking.id, &user.requester()).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first, booking);
}

#[tokio::test]
async fn test_reads_are_restricted_to_owner_or_admin() {
    let state = test_state();
    let car = seed_vehicle(&state, "Audi", 200.0).await;
    let (owner, _) = seed_user(&state, "owner@example.com", UserRole::User).await;
    let (other, _) = seed_user(&state, "other@example.com", UserRole::User).await;
    let (admin, _) = seed_user(&state, "admin@example.com", UserRole::Admin).await;
    let service = &state.booking_service;

    let (booking, _) = service
        .create(car.id, owner.id, jan(1, 0), jan(5, 0), BookingExtras::default())
        .await
        .unwrap();

    assert!(matches!(
        service.get(booking.id, &other.requester()).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(service.get(booking.id, &admin.requester()).await.is_ok());

    assert!(matches!(
        service.list_all(&owner.requester()).await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_lists_are_newest_first() {
    let state = test_state();
    let car = seed_vehicle(&state, "Audi", 200.0).await;
    let (user, _) = seed_user(&state, "ana@example.com", UserRole::User).await;
    let (other, _) = seed_user(&state, "other@example.com", UserRole::User).await;
    let admin = Requester {
        user_id: Uuid::new_v4(),
        role: UserRole::Admin,
    };
    let service = &state.booking_service;

    let mut created = Vec::new();
    for (i, owner) in [&user, &other, &user].into_iter().enumerate() {
        let start = jan(1, 0) + Duration::days(3 * i as i64);
        let (booking, _) = service
            .create(car.id, owner.id, start, start + Duration::days(2), BookingExtras::default())
            .await
            .unwrap();
        created.push(booking.id);
    }

    let mine: Vec<Uuid> = service
        .list_for_user(user.id)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(mine, vec![created[2], created[0]]);

    let all: Vec<Uuid> = service
        .list_all(&admin)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(all, vec![created[2], created[1], created[0]]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_simultaneous_overlapping_creates_admit_exactly_one() {
    let state = test_state();
    let car = seed_vehicle(&state, "Ferrari", 1000.0).await;
    let (first_user, _) = seed_user(&state, "first@example.com", UserRole::User).await;
    let (second_user, _) = seed_user(&state, "second@example.com", UserRole::User).await;
    let service = Arc::clone(&state.booking_service);

    let tasks = [first_user.id, second_user.id].map(|user_id| {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service
                .create(car.id, user_id, jan(1, 0), jan(5, 0), BookingExtras::default())
                .await
        })
    });

    let results: Vec<_> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::AvailabilityConflict(_))))
        .count();
    assert_eq!(successes, 1);
    assert_eq!(conflicts, 1);

    let admin = Requester {
        user_id: Uuid::new_v4(),
        role: UserRole::Admin,
    };
    assert_eq!(service.list_all(&admin).await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_concurrent_creates_never_overlap() {
    let state = test_state();
    let car = seed_vehicle(&state, "Ferrari", 1000.0).await;
    let (user, _) = seed_user(&state, "ana@example.com", UserRole::User).await;
    let service = Arc::clone(&state.booking_service);

    // Intervalos escalonados que se solapan con sus vecinos
    let tasks: Vec<_> = (0..10)
        .map(|i| {
            let service = Arc::clone(&service);
            let start = jan(1, 0) + Duration::hours(12 * i);
            tokio::spawn(async move {
                service
                    .create(car.id, user.id, start, start + Duration::days(1), BookingExtras::default())
                    .await
            })
        })
        .collect();

    for joined in futures::future::join_all(tasks).await {
        match joined.unwrap() {
            Ok(_) | Err(AppError::AvailabilityConflict(_)) => {}
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    let bookings = service.list_for_user(user.id).await.unwrap();
    assert!(!bookings.is_empty());
    for (i, a) in bookings.iter().enumerate() {
        for b in &bookings[i + 1..] {
            assert!(!a.range().overlaps(&b.range()), "{} overlaps {}", a.id, b.id);
        }
    }
}
