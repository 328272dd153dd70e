//! Utilidades compartidas para los tests de integración
#![allow(dead_code)]

pub mod mock_interface;

pub use mock_interface::{MockDelay, MockError, MockInterface, Operation};

use mpu9250_rs::{Mpu9250, Mpu9250Params};

/// Construye un driver sobre una interfaz simulada que comparte estado con
/// el `MockInterface` original del test
pub fn new_device(mock: &MockInterface) -> Mpu9250<MockInterface, MockDelay> {
    Mpu9250::new(mock.clone(), Mpu9250Params::default(), MockDelay)
}
