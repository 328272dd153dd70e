//! Biblioteca Rust para el sensor de movimiento InvenSense MPU9250
//!
//! Esta biblioteca proporciona una interfaz para controlar el sensor MPU9250,
//! un IMU de 9 ejes con giroscopio, acelerómetro y magnetómetro AK8963
//! conectado al bus I2C auxiliar del propio chip.
//!
//! El driver lleva el chip a un estado de funcionamiento conocido
//! (`reset_and_init`), coordina el encendido/apagado de cada sub-sensor,
//! configura las escalas completas, las tasas de muestreo y el filtro paso
//! bajo, y convierte las lecturas brutas de los registros a unidades
//! físicas.

#![cfg_attr(not(feature = "std"), no_std)]

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

// Importaciones internas
pub mod compass;
pub mod controls;
pub mod conversion;
pub mod device;
pub mod interface;
pub mod motion;
pub mod register;
pub mod types;

// Re-exports públicos
pub use controls::IntStatus;
pub use conversion::{accel_raw_to_mg, gyro_raw_to_dps, temp_raw_to_millicelsius};
pub use device::{DeviceConfig, Mpu9250, Mpu9250Error, Mpu9250Params};
pub use motion::WomWakeFreq;
pub use types::{
    AccelData, AccelFullScale, CompassData, GyroData, GyroFullScale, SensorPower, SettleDelays,
};

use crate::interface::I2cInterface;

/// Crea un nuevo dispositivo MPU9250 usando el bus I2C
pub fn new_i2c_device<I, D, E>(
    i2c: I,
    params: Mpu9250Params,
    delay: D,
) -> Mpu9250<I2cInterface<I>, D>
where
    I: I2c<Error = E>,
    D: DelayNs,
{
    let interface = I2cInterface::new(i2c);
    Mpu9250::new(interface, params, delay)
}
