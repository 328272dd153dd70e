//! Tests de lectura y conversión a unidades físicas

mod common;

use common::{new_device, MockInterface, Operation};
use mpu9250_rs::register::mpu;
use mpu9250_rs::Mpu9250Error;

const ADDR: u8 = 0x68;

#[test]
fn gyro_decodes_big_endian() {
    let mock = MockInterface::new();
    let mut dev = new_device(&mock);
    mock.set_register_block(ADDR, mpu::GYRO_XOUT_H, &[0x10, 0x00, 0x20, 0x00, 0x30, 0x00]);

    // Escala por defecto de la instantánea: 250 dps
    let gyro = dev.read_gyro().unwrap();
    assert_eq!(gyro.x as i32, (0x1000 * 250) / 0x7FFF);
    assert_eq!(gyro.y as i32, (0x2000 * 250) / 0x7FFF);
    assert_eq!(gyro.z as i32, (0x3000 * 250) / 0x7FFF);
}

#[test]
fn compass_decodes_little_endian() {
    let mock = MockInterface::new();
    let mut dev = new_device(&mock);
    // Ajustes de fábrica neutros (128) cargados por la puesta en marcha
    dev.reset_and_init().unwrap();

    // Los mismos bytes que el caso big-endian: aquí el byte bajo va primero
    mock.set_register_block(
        ADDR,
        mpu::EXT_SENS_DATA_00,
        &[0x10, 0x00, 0x20, 0x00, 0x30, 0x00],
    );

    let compass = dev.read_compass().unwrap();
    // 0x0010, 0x0020 y 0x0030 con factor 1.0 y escala 0.3 por LSB
    assert_eq!(compass.x, 4);
    assert_eq!(compass.y, 9);
    assert_eq!(compass.z, 14);
}

#[test]
fn compass_applies_sensitivity_adjustment() {
    let mock = MockInterface::new();
    let mut dev = new_device(&mock);
    // Ajuste de fábrica por encima de 128 en el eje X
    mock.set_register_block(0x0C, 0x10, &[255, 128, 128]);
    dev.reset_and_init().unwrap();

    mock.set_register_block(
        ADDR,
        mpu::EXT_SENS_DATA_00,
        &[0xE8, 0x03, 0xE8, 0x03, 0x00, 0x00],
    );

    // raw 1000: con factor (255-128)*0.5/128+1 ≈ 1.496 frente a 1.0
    let compass = dev.read_compass().unwrap();
    assert_eq!(compass.x, 448); // 1000 * 1.496 * 0.3
    assert_eq!(compass.y, 300); // 1000 * 1.0 * 0.3
    assert_eq!(compass.z, 0);
}

#[test]
fn accel_scales_with_configured_range() {
    let mock = MockInterface::new();
    let mut dev = new_device(&mock);
    mock.set_register_block(ADDR, mpu::ACCEL_XOUT_H, &[0x40, 0x00, 0xC0, 0x00, 0x7F, 0xFF]);

    dev.set_accel_fsr(mpu9250_rs::AccelFullScale::Fs2G).unwrap();
    let accel = dev.read_accel().unwrap();
    // 16384/32767 de 2000 mg, -16384/32767 y fondo de escala
    assert_eq!(accel.x, 1000);
    assert_eq!(accel.y, -1000);
    assert_eq!(accel.z, 2000);

    // El mismo dato bruto con rango de 16 g vale ocho veces más
    dev.set_accel_fsr(mpu9250_rs::AccelFullScale::Fs16G).unwrap();
    let accel = dev.read_accel().unwrap();
    assert_eq!(accel.x, 8000);
}

#[test]
fn temperature_reference_points() {
    let mock = MockInterface::new();
    let mut dev = new_device(&mock);

    mock.set_register_block(ADDR, mpu::TEMP_OUT_H, &[0x00, 0x00]);
    assert_eq!(dev.read_temperature().unwrap(), 35_000);

    // 340 LSB equivalen a un grado: 36 °C
    mock.set_register_block(ADDR, mpu::TEMP_OUT_H, &[0x01, 0x54]);
    assert_eq!(dev.read_temperature().unwrap(), 36_000);
}

#[test]
fn reads_hold_the_bus_for_a_single_burst() {
    let mock = MockInterface::new();
    let mut dev = new_device(&mock);

    dev.read_gyro().unwrap();

    // Adquirir, una única lectura burst, liberar; la conversión ocurre
    // fuera del bus
    let ops = mock.operations();
    assert_eq!(
        ops,
        vec![
            Operation::Acquire,
            Operation::ReadReg {
                addr: ADDR,
                reg: mpu::GYRO_XOUT_H,
                len: 6
            },
            Operation::Release,
        ]
    );
}

#[test]
fn read_failure_releases_the_bus() {
    let mock = MockInterface::new();
    let mut dev = new_device(&mock);
    mock.fail_next_read();

    assert_eq!(dev.read_accel(), Err(Mpu9250Error::InterfaceError));
    assert_eq!(mock.operations().last(), Some(&Operation::Release));
}
