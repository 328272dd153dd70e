//! Funciones de conversión para datos del sensor MPU9250
//!
//! Este módulo proporciona funciones puras para convertir datos raw del
//! sensor a unidades físicas: velocidad angular en grados/segundo,
//! aceleración en mili-g, campo magnético en unidades del magnetómetro y
//! temperatura en miligrados Celsius. Ninguna función toca el bus.

use crate::types::{AccelFullScale, GyroFullScale};

/// Valor máximo de una muestra de 16 bits con signo
pub const MAX_VALUE: i32 = 0x7FFF;

/// Decodifica tres valores de 16 bits big-endian (die principal)
///
/// El giroscopio, el acelerómetro y el sensor de temperatura publican sus
/// muestras con el byte alto primero.
#[inline]
pub fn triplet_from_be(data: &[u8; 6]) -> [i16; 3] {
    [
        i16::from_be_bytes([data[0], data[1]]),
        i16::from_be_bytes([data[2], data[3]]),
        i16::from_be_bytes([data[4], data[5]]),
    ]
}

/// Decodifica tres valores de 16 bits little-endian (magnetómetro)
///
/// El AK8963 publica sus muestras con el byte bajo primero, al contrario
/// que el die principal. Es una peculiaridad del chip, no un error.
#[inline]
pub fn triplet_from_le(data: &[u8; 6]) -> [i16; 3] {
    [
        i16::from_le_bytes([data[0], data[1]]),
        i16::from_le_bytes([data[2], data[3]]),
        i16::from_le_bytes([data[4], data[5]]),
    ]
}

/// Convierte datos brutos de giroscopio a grados/segundo según la escala
/// configurada
pub fn gyro_raw_to_dps(raw: [i16; 3], scale: GyroFullScale) -> [i16; 3] {
    let fsr = scale.dps();
    [
        (raw[0] as i32 * fsr / MAX_VALUE) as i16,
        (raw[1] as i32 * fsr / MAX_VALUE) as i16,
        (raw[2] as i32 * fsr / MAX_VALUE) as i16,
    ]
}

/// Convierte datos brutos de acelerómetro a mili-g según la escala
/// configurada
pub fn accel_raw_to_mg(raw: [i16; 3], scale: AccelFullScale) -> [i16; 3] {
    let fsr = scale.mg();
    [
        (raw[0] as i32 * fsr / MAX_VALUE) as i16,
        (raw[1] as i32 * fsr / MAX_VALUE) as i16,
        (raw[2] as i32 * fsr / MAX_VALUE) as i16,
    ]
}

/// Factor de corrección de sensibilidad por eje del magnetómetro
///
/// `asa` es el byte de ajuste leído de la ROM de fábrica; 128 equivale a
/// factor 1.0.
#[inline]
pub fn compass_adjust_factor(asa: u8) -> f32 {
    ((asa as f32 - 128.0) * 0.5) / 128.0 + 1.0
}

/// Aplica la corrección de sensibilidad y la escala fija del magnetómetro
/// (0.3 unidades por LSB)
pub fn compass_raw_to_units(raw: [i16; 3], adjust: [u8; 3]) -> [i16; 3] {
    [
        (raw[0] as f32 * compass_adjust_factor(adjust[0]) * 0.3) as i16,
        (raw[1] as f32 * compass_adjust_factor(adjust[1]) * 0.3) as i16,
        (raw[2] as f32 * compass_adjust_factor(adjust[2]) * 0.3) as i16,
    ]
}

/// Convierte el valor bruto del sensor de temperatura a miligrados Celsius
pub fn temp_raw_to_millicelsius(raw: i16) -> i32 {
    (raw as i32 * 1000) / 340 + 35_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_die_decodes_big_endian() {
        let data = [0x10, 0x00, 0x20, 0x00, 0x30, 0x00];
        assert_eq!(triplet_from_be(&data), [0x1000, 0x2000, 0x3000]);
    }

    #[test]
    fn compass_decodes_little_endian() {
        // Los mismos bytes que en el caso big-endian producen valores
        // distintos: el magnetómetro pone el byte bajo primero
        let data = [0x10, 0x00, 0x20, 0x00, 0x30, 0x00];
        assert_eq!(triplet_from_le(&data), [0x0010, 0x0020, 0x0030]);
    }

    #[test]
    fn gyro_full_scale_hits_range_limit() {
        let converted = gyro_raw_to_dps([i16::MAX, i16::MIN, 0], GyroFullScale::Fs2000Dps);
        assert_eq!(converted[0], 2000);
        assert_eq!(converted[1], -2000);
        assert_eq!(converted[2], 0);
    }

    #[test]
    fn gyro_scaling_at_250dps() {
        let converted = gyro_raw_to_dps([0x1000, 0x2000, 0x3000], GyroFullScale::Fs250Dps);
        assert_eq!(converted, [31, 62, 93]);
    }

    #[test]
    fn accel_scaling_at_2g() {
        let converted = accel_raw_to_mg([i16::MAX, -16384, 8192], AccelFullScale::Fs2G);
        assert_eq!(converted[0], 2000);
        assert_eq!(converted[1], -1000);
        assert_eq!(converted[2], 500);
    }

    #[test]
    fn compass_adjust_neutral_at_128() {
        assert_eq!(compass_adjust_factor(128), 1.0);
        // Valor de fábrica típico por encima de 128
        assert!(compass_adjust_factor(170) > 1.16 && compass_adjust_factor(170) < 1.17);
    }

    #[test]
    fn compass_units_with_neutral_adjust() {
        let converted = compass_raw_to_units([100, -100, 0], [128, 128, 128]);
        assert_eq!(converted, [30, -30, 0]);
    }

    #[test]
    fn temperature_reference_points() {
        assert_eq!(temp_raw_to_millicelsius(0), 35_000);
        assert_eq!(temp_raw_to_millicelsius(340), 36_000);
        assert_eq!(temp_raw_to_millicelsius(-340), 34_000);
    }
}
