//! Soporte del magnetómetro AK8963 conectado al bus I2C auxiliar del MPU9250
//!
//! Durante el funcionamiento normal el MPU9250 actúa como máster I2C y
//! retransmite los datos del magnetómetro a sus registros de datos externos.
//! El modo bypass solo se usa durante la puesta en marcha (verificación de
//! identidad y lectura de la ROM de calibración) y en la secuencia
//! wake-on-motion; el muestreo ordinario nunca vuelve a entrar en bypass.

use crate::conversion::{compass_raw_to_units, triplet_from_le};
use crate::device::{Mpu9250, Mpu9250Error, Mpu9250Params};
use crate::interface::{BusGuard, Interface};
use crate::register::{ak8963, mpu};
use crate::types::{ak_val, bits, CompassData};
use embedded_hal::delay::DelayNs;

/// Conmuta el modo bypass del bus I2C auxiliar
///
/// Con bypass activo el host habla directamente con el magnetómetro; sin él,
/// el máster I2C interno retransmite. Cada conmutación exige un tiempo de
/// asentamiento entre deshabilitar un camino y habilitar el otro.
///
/// El llamante debe tener ya adquirido el transporte: esta sub-secuencia
/// siempre forma parte de una operación mayor ya guardada, por eso recibe la
/// guardia en lugar de adquirirla.
pub(crate) fn conf_bypass<I, D>(
    bus: &mut BusGuard<'_, I>,
    delay: &mut D,
    params: &Mpu9250Params,
    enable: bool,
) -> Result<(), Mpu9250Error>
where
    I: Interface,
    D: DelayNs,
{
    let user_ctrl = bus.read_reg(params.addr, mpu::USER_CTRL)?;

    if enable {
        bus.write_reg(params.addr, mpu::USER_CTRL, user_ctrl & !bits::I2C_MST_EN)?;
        delay.delay_us(params.delays.bypass_us);
        bus.write_reg(params.addr, mpu::INT_PIN_CFG, bits::INT_BYPASS_EN)?;
    } else {
        bus.write_reg(params.addr, mpu::USER_CTRL, user_ctrl | bits::I2C_MST_EN)?;
        delay.delay_us(params.delays.bypass_us);
        bus.write_reg(params.addr, mpu::INT_PIN_CFG, 0x00)?;
    }

    Ok(())
}

/// Da de alta el magnetómetro durante la puesta en marcha
///
/// Verifica la identidad del AK8963, lee los tres bytes de ajuste de
/// sensibilidad de la ROM de fábrica y programa las líneas esclavas 0 y 1
/// para que el máster I2C interno lea los datos y dispare una medición
/// única en cada muestra. Devuelve los bytes de ajuste.
///
/// El llamante debe tener ya adquirido el transporte. Si la identidad no
/// coincide se aborta con [`Mpu9250Error::DeviceNotResponding`]; los
/// registros ya tocados se quedan como están, el siguiente
/// `reset_and_init` parte de un chip reseteado.
pub(crate) fn init_compass<I, D>(
    bus: &mut BusGuard<'_, I>,
    delay: &mut D,
    params: &Mpu9250Params,
) -> Result<[u8; 3], Mpu9250Error>
where
    I: Interface,
    D: DelayNs,
{
    // Hablar directamente con el magnetómetro
    conf_bypass(bus, delay, params, true)?;

    // Comprobar que el magnetómetro responde con su identidad
    let whoami = bus.read_reg(params.compass_addr, ak8963::WIA)?;
    if whoami != ak_val::WIA_VAL {
        return Err(Mpu9250Error::DeviceNotResponding);
    }

    // Power down, acceso a la ROM de calibración, lectura de los ajustes y
    // power down de nuevo; cada cambio de modo necesita su asentamiento
    bus.write_reg(params.compass_addr, ak8963::CNTL1, ak_val::POWER_DOWN)?;
    delay.delay_us(params.delays.comp_mode_us);
    bus.write_reg(params.compass_addr, ak8963::CNTL1, ak_val::FUSE_ROM_ACCESS)?;
    delay.delay_us(params.delays.comp_mode_us);
    let mut adjust = [0u8; 3];
    bus.read_regs(params.compass_addr, ak8963::ASAX, &mut adjust)?;
    bus.write_reg(params.compass_addr, ak8963::CNTL1, ak_val::POWER_DOWN)?;
    delay.delay_us(params.delays.comp_mode_us);

    // Devolver el control al máster I2C interno
    conf_bypass(bus, delay, params, false)?;

    // Máster único, esperando a los datos externos
    bus.write_reg(params.addr, mpu::I2C_MST_CTRL, bits::WAIT_FOR_ES)?;

    // Línea esclava 0: lee los 6 registros de datos del magnetómetro en
    // cada muestra
    bus.write_reg(
        params.addr,
        mpu::I2C_SLV0_ADDR,
        bits::SLAVE_RW | params.compass_addr,
    )?;
    bus.write_reg(params.addr, mpu::I2C_SLV0_REG, ak8963::HXL)?;
    bus.write_reg(params.addr, mpu::I2C_SLV0_CTRL, bits::SLAVE_EN | 0x06)?;

    // Línea esclava 1: escribe el comando de medición única en el registro
    // de control del magnetómetro en cada muestra
    bus.write_reg(params.addr, mpu::I2C_SLV1_ADDR, params.compass_addr)?;
    bus.write_reg(params.addr, mpu::I2C_SLV1_REG, ak8963::CNTL1)?;
    bus.write_reg(params.addr, mpu::I2C_SLV1_CTRL, bits::SLAVE_EN | 0x01)?;
    bus.write_reg(params.addr, mpu::I2C_SLV1_DO, ak_val::SINGLE_MEASURE)?;

    // Ambas líneas esclavas operan en cada muestra retardada
    bus.write_reg(
        params.addr,
        mpu::I2C_MST_DELAY_CTRL,
        bits::SLV0_DELAY_EN | bits::SLV1_DELAY_EN,
    )?;

    Ok(adjust)
}

/// Lecturas del magnetómetro
impl<I, D, E> Mpu9250<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
{
    /// Lee el magnetómetro retransmitido y aplica el ajuste de sensibilidad
    ///
    /// Los datos llegan de los registros de datos externos del die
    /// principal, donde la línea esclava 0 los deja en cada muestra; no
    /// hace falta entrar en bypass.
    pub fn read_compass(&mut self) -> Result<CompassData, Mpu9250Error> {
        let mut data = [0u8; 6];
        {
            let mut bus = BusGuard::acquire(&mut self.interface)?;
            bus.read_regs(self.params.addr, mpu::EXT_SENS_DATA_00, &mut data)?;
        }

        // El AK8963 entrega little-endian, al contrario que el die principal
        let [x, y, z] = compass_raw_to_units(triplet_from_le(&data), self.conf.compass_adjust);
        Ok(CompassData { x, y, z })
    }
}
