//! Locks por vehículo
//!
//! Serializa la secuencia "comprobar disponibilidad + escribir" para un
//! mismo vehículo dentro del proceso. Reservas de vehículos distintos no
//! se bloquean entre sí.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

#[derive(Default)]
pub struct VehicleLocks {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl VehicleLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Espera hasta obtener el lock exclusivo del vehículo
    pub async fn lock(&self, car_id: Uuid) -> OwnedMutexGuard<()> {
        // El guard de DashMap se suelta antes del await
        let mutex = self.locks.entry(car_id).or_default().clone();
        mutex.lock_owned().await
    }
}
