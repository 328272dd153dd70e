//! Controles básicos del MPU9250: escalas completas, tasas de muestreo,
//! filtro paso bajo e interrupciones

use crate::device::{Mpu9250, Mpu9250Error};
use crate::interface::{BusGuard, Interface};
use crate::register::mpu;
use crate::types::{bits, rates, AccelFullScale, DlpfBandwidth, GyroFullScale};
use embedded_hal::delay::DelayNs;

/// Estado decodificado del registro de interrupciones
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntStatus {
    /// Se disparó la interrupción de wake-on-motion
    pub wom: bool,
    /// Hay datos brutos nuevos disponibles
    pub raw_data_ready: bool,
}

impl<I, D, E> Mpu9250<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
{
    /// Configura la escala completa del giroscopio
    pub fn set_gyro_fsr(&mut self, fsr: GyroFullScale) -> Result<(), Mpu9250Error> {
        if self.conf.gyro_fsr == fsr {
            return Ok(());
        }

        {
            let mut bus = BusGuard::acquire(&mut self.interface)?;
            bus.write_reg(self.params.addr, mpu::GYRO_CONFIG, fsr.reg_bits())?;
        }
        self.conf.gyro_fsr = fsr;

        Ok(())
    }

    /// Configura la escala completa del acelerómetro
    pub fn set_accel_fsr(&mut self, fsr: AccelFullScale) -> Result<(), Mpu9250Error> {
        if self.conf.accel_fsr == fsr {
            return Ok(());
        }

        {
            let mut bus = BusGuard::acquire(&mut self.interface)?;
            bus.write_reg(self.params.addr, mpu::ACCEL_CONFIG, fsr.reg_bits())?;
        }
        self.conf.accel_fsr = fsr;

        Ok(())
    }

    /// Configura la tasa de muestreo del grupo principal
    ///
    /// El divisor entero no siempre alcanza la tasa pedida exacta: la
    /// instantánea guarda la tasa *efectiva* recalculada, que es la que los
    /// llamantes deben consultar. Como efecto asociado se reprograma el
    /// filtro paso bajo a la mitad de la nueva tasa efectiva, dentro de la
    /// misma adquisición del transporte.
    pub fn set_sample_rate(&mut self, rate: u16) -> Result<(), Mpu9250Error> {
        if !(rates::MIN_SAMPLE_RATE..=rates::MAX_SAMPLE_RATE).contains(&rate) {
            return Err(Mpu9250Error::InvalidConfiguration);
        }
        if self.conf.sample_rate == rate {
            return Ok(());
        }

        // Divisor entero para aproximar la tasa pedida
        let divider = (rates::BASE_SAMPLE_RATE / rate - 1) as u8;

        {
            let mut bus = BusGuard::acquire(&mut self.interface)?;
            bus.write_reg(self.params.addr, mpu::SMPLRT_DIV, divider)?;

            // Guardar la tasa efectiva resultante
            self.conf.sample_rate = rates::BASE_SAMPLE_RATE / (divider as u16 + 1);

            // El filtro sigue siempre a la mitad de la tasa efectiva
            conf_lpf(&mut bus, self.params.addr, self.conf.sample_rate >> 1)?;
        }

        Ok(())
    }

    /// Configura la tasa del relé del magnetómetro
    ///
    /// La base del divisor es la tasa principal *actual*; pedir una tasa por
    /// encima de ella se rechaza, no se recorta.
    pub fn set_compass_sample_rate(&mut self, rate: u8) -> Result<(), Mpu9250Error> {
        if !(rates::MIN_COMP_SAMPLE_RATE..=rates::MAX_COMP_SAMPLE_RATE).contains(&rate)
            || rate as u16 > self.conf.sample_rate
        {
            return Err(Mpu9250Error::InvalidConfiguration);
        }
        if self.conf.compass_sample_rate == rate {
            return Ok(());
        }

        let divider = (self.conf.sample_rate / rate as u16 - 1) as u8;

        {
            let mut bus = BusGuard::acquire(&mut self.interface)?;
            bus.write_reg(self.params.addr, mpu::I2C_SLV4_CTRL, divider)?;
        }

        // Guardar la tasa efectiva resultante
        self.conf.compass_sample_rate = (self.conf.sample_rate / (divider as u16 + 1)) as u8;

        Ok(())
    }

    /// Habilita o deshabilita la generación de interrupciones
    ///
    /// Al habilitar, el pin queda configurado como pulso activo que
    /// cualquier lectura de estado limpia, y se genera interrupción por
    /// datos brutos listos. Al deshabilitar solo se borra el registro de
    /// habilitación; la configuración del pin se conserva.
    pub fn set_interrupt(&mut self, enable: bool) -> Result<(), Mpu9250Error> {
        let mut bus = BusGuard::acquire(&mut self.interface)?;

        if enable {
            bus.write_reg(self.params.addr, mpu::INT_PIN_CFG, bits::INT_ANYRD_2CLEAR)?;
            bus.write_reg(self.params.addr, mpu::INT_ENABLE, bits::INT_RAW_RDY_EN)?;
        } else {
            bus.write_reg(self.params.addr, mpu::INT_ENABLE, 0x00)?;
        }

        Ok(())
    }

    /// Lee y decodifica el registro de estado de interrupciones
    pub fn read_int_status(&mut self) -> Result<IntStatus, Mpu9250Error> {
        let mut status = IntStatus::default();

        let value = {
            let mut bus = BusGuard::acquire(&mut self.interface)?;
            bus.read_reg(self.params.addr, mpu::INT_STATUS)?
        };

        if value & bits::INT_STATUS_WOM != 0 {
            status.wom = true;
        }
        if value & bits::INT_STATUS_RAW != 0 {
            status.raw_data_ready = true;
        }

        Ok(status)
    }
}

/// Programa el filtro paso bajo compartido para la media tasa objetivo
///
/// Escribe el mismo ajuste en el registro de configuración compartido
/// (giroscopio y temperatura) y en el secundario del acelerómetro, y borra
/// los bits fchoice del giroscopio para que el filtro compartido tenga
/// efecto. Las tres escrituras van bajo la adquisición del llamante: una
/// aplicación parcial no tiene sentido por sí sola.
pub(crate) fn conf_lpf<I>(
    bus: &mut BusGuard<'_, I>,
    addr: u8,
    half_rate: u16,
) -> Result<(), Mpu9250Error>
where
    I: Interface,
{
    let setting = DlpfBandwidth::for_half_rate(half_rate);

    // Registro compartido de giroscopio y temperatura
    bus.write_reg(addr, mpu::CONFIG, setting.reg_bits())?;

    // El acelerómetro lleva el mismo ajuste en su registro secundario; hay
    // que limpiar también su bit fchoice
    bus.modify_reg(addr, mpu::ACCEL_CONFIG_2, |value| {
        (value & !bits::ACCEL_DLPF_MASK) | setting.reg_bits()
    })?;

    // Borrar los bits fchoice del giroscopio para habilitar el filtro
    bus.modify_reg(addr, mpu::GYRO_CONFIG, |value| {
        value & !bits::GYRO_FCHOICE_MASK
    })?;

    Ok(())
}
