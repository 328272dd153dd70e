//! Modo wake-on-motion: el chip queda ciclado en bajo consumo con solo el
//! acelerómetro activo y genera una interrupción al superar un umbral de
//! movimiento

use crate::compass::conf_bypass;
use crate::device::{Mpu9250, Mpu9250Error};
use crate::interface::{BusGuard, Interface};
use crate::register::{ak8963, mpu};
use crate::types::{ak_val, bits};
use embedded_hal::delay::DelayNs;

/// Frecuencias de despertar del acelerómetro en modo ciclado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum WomWakeFreq {
    /// 0.24 Hz
    Hz0_24 = 0,
    /// 0.49 Hz
    Hz0_49 = 1,
    /// 0.98 Hz
    Hz0_98 = 2,
    /// 1.95 Hz
    Hz1_95 = 3,
    /// 3.91 Hz
    Hz3_91 = 4,
    /// 7.81 Hz
    Hz7_81 = 5,
    /// 15.63 Hz
    Hz15_63 = 6,
    /// 31.25 Hz
    Hz31_25 = 7,
    /// 62.50 Hz
    Hz62_50 = 8,
    /// 125 Hz
    Hz125 = 9,
    /// 250 Hz
    Hz250 = 10,
    /// 500 Hz
    Hz500 = 11,
}

impl WomWakeFreq {
    /// Valor a escribir en el registro LP_ACCEL_ODR
    pub const fn reg_bits(self) -> u8 {
        self as u8
    }
}

impl<I, D, E> Mpu9250<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
{
    /// Programa el chip en modo wake-on-motion
    ///
    /// Secuencia estrictamente ordenada bajo una única adquisición del
    /// transporte: apaga el magnetómetro vía bypass, resetea y despierta el
    /// chip, deja solo el camino del acelerómetro, selecciona el ancho de
    /// banda de wake-on-motion, habilita la interrupción y el comparador de
    /// movimiento, programa el umbral (`threshold`, 4 mg por LSB) y la
    /// frecuencia de despertar, y finalmente pasa a modo ciclado.
    ///
    /// Los pasos no son reintentables por separado: un fallo del transporte
    /// deja el dispositivo en un estado intermedio sin especificar y exige
    /// un `reset_and_init` completo antes del siguiente intento.
    pub fn enable_wake_on_motion(
        &mut self,
        threshold: u8,
        wake_freq: WomWakeFreq,
    ) -> Result<(), Mpu9250Error> {
        let mut bus = BusGuard::acquire(&mut self.interface)?;

        // Paso 1: apagar el magnetómetro hablándole directamente en bypass
        conf_bypass(&mut bus, &mut self.delay, &self.params, true)?;
        bus.write_reg(self.params.compass_addr, ak8963::CNTL1, ak_val::POWER_DOWN)?;
        self.delay.delay_us(self.params.delays.comp_mode_us);
        conf_bypass(&mut bus, &mut self.delay, &self.params, false)?;

        // Paso 2: resetear y despertar el chip
        bus.write_reg(self.params.addr, mpu::PWR_MGMT_1, bits::H_RESET)?;
        self.delay.delay_us(self.params.delays.reset_us);
        bus.write_reg(self.params.addr, mpu::PWR_MGMT_1, bits::WAKEUP)?;

        // Paso 3: habilitar el acelerómetro, deshabilitar el giroscopio.
        // La expresión reproduce la captura del dispositivo de referencia:
        // limpia los bits de standby del acelerómetro y conserva los del
        // giroscopio tal como estuvieran.
        bus.modify_reg(self.params.addr, mpu::PWR_MGMT_2, |pwr_2| {
            pwr_2 & !(bits::PWR_ACCEL_STBY | !bits::PWR_GYRO_STBY)
        })?;

        // Paso 4: ancho de banda del acelerómetro a 184 Hz con fchoice_b = 1
        bus.modify_reg(self.params.addr, mpu::ACCEL_CONFIG_2, |value| {
            (value & !bits::ACCEL_DLPF_MASK) | bits::ACCEL_CFG_WOM
        })?;

        // Paso 5: habilitar la interrupción de wake-on-motion
        bus.write_reg(self.params.addr, mpu::INT_ENABLE, bits::INT_WOM_EN)?;

        // Paso 6: habilitar el comparador de movimiento del acelerómetro
        bus.modify_reg(self.params.addr, mpu::MOT_DETECT_CTRL, |value| {
            value | bits::ACCEL_INTEL_CFG
        })?;

        // Paso 7: umbral de movimiento
        bus.write_reg(self.params.addr, mpu::WOM_THR, threshold)?;

        // Paso 8: frecuencia de despertar
        bus.write_reg(self.params.addr, mpu::LP_ACCEL_ODR, wake_freq.reg_bits())?;

        // Paso 9: entrar en modo ciclado de bajo consumo
        bus.write_reg(self.params.addr, mpu::PWR_MGMT_1, bits::CYCLE)?;

        Ok(())
    }
}
