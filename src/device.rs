//! Núcleo del driver: estructura del dispositivo, máquina de estados de
//! energía y lecturas del die principal

use crate::compass;
use crate::conversion::{
    accel_raw_to_mg, gyro_raw_to_dps, temp_raw_to_millicelsius, triplet_from_be,
};
use crate::interface::{BusGuard, Interface, InterfaceError};
use crate::register::mpu;
use crate::types::{
    ak_val, bits, AccelData, AccelFullScale, GyroData, GyroFullScale, SensorPower, SettleDelays,
};
use embedded_hal::delay::DelayNs;

/// Dirección I2C del MPU9250 con el pin AD0 a nivel bajo
pub const I2C_ADDRESS: u8 = 0x68;

/// Dirección I2C del magnetómetro AK8963 interno
pub const COMPASS_I2C_ADDRESS: u8 = 0x0C;

/// Errores del driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mpu9250Error {
    /// No se pudo adquirir acceso exclusivo al transporte; reintentable
    BusUnavailable,
    /// Una primitiva de lectura/escritura falló a mitad de transacción
    InterfaceError,
    /// Valor solicitado fuera del rango soportado; el estado no cambia
    InvalidConfiguration,
    /// El magnetómetro no respondió a la verificación de identidad
    DeviceNotResponding,
}

impl Mpu9250Error {
    /// Absorbe cualquier error del transporte como fallo de interfaz
    pub fn from_error<E>(_error: E) -> Self {
        Mpu9250Error::InterfaceError
    }
}

impl<E> From<InterfaceError<E>> for Mpu9250Error {
    fn from(error: InterfaceError<E>) -> Self {
        match error {
            InterfaceError::Busy => Mpu9250Error::BusUnavailable,
            InterfaceError::I2cError(_) => Mpu9250Error::InterfaceError,
            InterfaceError::InvalidParameter => Mpu9250Error::InvalidConfiguration,
        }
    }
}

/// Parámetros inmutables de enlace al bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mpu9250Params {
    /// Dirección I2C del die principal
    pub addr: u8,
    /// Dirección I2C del magnetómetro
    pub compass_addr: u8,
    /// Tasa de muestreo a programar durante la puesta en marcha (Hz)
    pub sample_rate: u16,
    /// Tiempos de asentamiento del hardware
    pub delays: SettleDelays,
}

impl Default for Mpu9250Params {
    fn default() -> Self {
        Self {
            addr: I2C_ADDRESS,
            compass_addr: COMPASS_I2C_ADDRESS,
            sample_rate: 200,
            delays: SettleDelays::default(),
        }
    }
}

/// Instantánea de configuración del dispositivo
///
/// Refleja siempre el último valor escrito con éxito en el chip; una
/// petición rechazada no modifica ni la instantánea ni el dispositivo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    /// Estado de alimentación del acelerómetro
    pub accel_pwr: SensorPower,
    /// Estado de alimentación del giroscopio
    pub gyro_pwr: SensorPower,
    /// Estado de alimentación del magnetómetro
    pub compass_pwr: SensorPower,
    /// Escala completa configurada del giroscopio
    pub gyro_fsr: GyroFullScale,
    /// Escala completa configurada del acelerómetro
    pub accel_fsr: AccelFullScale,
    /// Tasa de muestreo efectiva del grupo principal (Hz)
    pub sample_rate: u16,
    /// Tasa efectiva del relé del magnetómetro (Hz)
    pub compass_sample_rate: u8,
    /// Bytes de ajuste de sensibilidad de fábrica del magnetómetro,
    /// leídos una sola vez durante la puesta en marcha
    pub compass_adjust: [u8; 3],
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            accel_pwr: SensorPower::On,
            gyro_pwr: SensorPower::On,
            compass_pwr: SensorPower::On,
            gyro_fsr: GyroFullScale::Fs250Dps,
            accel_fsr: AccelFullScale::Fs16G,
            sample_rate: 0,
            compass_sample_rate: 0,
            compass_adjust: [0, 0, 0],
        }
    }
}

/// Driver del MPU9250
pub struct Mpu9250<I, D> {
    pub(crate) interface: I,
    pub(crate) params: Mpu9250Params,
    pub(crate) conf: DeviceConfig,
    pub(crate) delay: D,
}

impl<I, D, E> Mpu9250<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
{
    /// Crea una nueva instancia del driver sin tocar el hardware
    pub fn new(interface: I, params: Mpu9250Params, delay: D) -> Self {
        Self {
            interface,
            params,
            conf: DeviceConfig::default(),
            delay,
        }
    }

    /// Instantánea de configuración actual
    pub fn config(&self) -> &DeviceConfig {
        &self.conf
    }

    /// Parámetros de enlace al bus
    pub fn params(&self) -> &Mpu9250Params {
        &self.params
    }

    /// Restaura la instantánea por defecto y ejecuta la puesta en marcha
    /// completa
    pub fn init(&mut self) -> Result<(), Mpu9250Error> {
        self.conf = DeviceConfig::default();
        self.reset_and_init()
    }

    /// Resetea el chip y lo lleva al estado de funcionamiento por defecto
    ///
    /// Programa escalas completas de 2000 dps / 2 g, la tasa de muestreo de
    /// los parámetros, deshabilita las interrupciones, da de alta el
    /// magnetómetro (identidad + calibración + líneas esclavas) y enciende
    /// el grupo principal con el reloj PLL. Un fallo de identidad del
    /// magnetómetro aborta con [`Mpu9250Error::DeviceNotResponding`]; el
    /// remedio es reintentar la puesta en marcha completa.
    pub fn reset_and_init(&mut self) -> Result<(), Mpu9250Error> {
        let delays = self.params.delays;

        // Resetear los registros del MPU9250 y despertar el chip
        {
            let mut bus = BusGuard::acquire(&mut self.interface)?;
            bus.write_reg(self.params.addr, mpu::PWR_MGMT_1, bits::H_RESET)?;
            self.delay.delay_us(delays.reset_us);
            bus.write_reg(self.params.addr, mpu::PWR_MGMT_1, bits::WAKEUP)?;
        }

        // Escalas completas por defecto y tasa de muestreo solicitada
        self.set_gyro_fsr(GyroFullScale::Fs2000Dps)?;
        self.set_accel_fsr(AccelFullScale::Fs2G)?;
        self.set_sample_rate(self.params.sample_rate)?;

        // Deshabilitar la generación de interrupciones e inicializar el
        // magnetómetro dentro de la misma adquisición
        {
            let mut bus = BusGuard::acquire(&mut self.interface)?;
            bus.write_reg(self.params.addr, mpu::INT_ENABLE, 0x00)?;
            let adjust = compass::init_compass(&mut bus, &mut self.delay, &self.params)?;
            drop(bus);
            self.conf.compass_adjust = adjust;
        }

        self.set_compass_sample_rate(10)?;

        // Encender todos los sensores con el reloj PLL
        {
            let mut bus = BusGuard::acquire(&mut self.interface)?;
            bus.write_reg(self.params.addr, mpu::PWR_MGMT_1, bits::CLK_PLL)?;
            bus.modify_reg(self.params.addr, mpu::PWR_MGMT_2, |pwr_2| {
                pwr_2 & !(bits::PWR_ACCEL_STBY | bits::PWR_GYRO_STBY)
            })?;
        }
        self.delay.delay_us(delays.pwr_change_us);

        Ok(())
    }

    /// Enciende o apaga el acelerómetro
    pub fn set_accel_power(&mut self, pwr: SensorPower) -> Result<(), Mpu9250Error> {
        if self.conf.accel_pwr == pwr {
            return Ok(());
        }

        {
            let mut bus = BusGuard::acquire(&mut self.interface)?;

            // Leer la configuración actual de standby
            let mut pwr_2 = bus.read_reg(self.params.addr, mpu::PWR_MGMT_2)?;
            let pwr_1 = match pwr {
                SensorPower::On => {
                    pwr_2 &= !bits::PWR_ACCEL_STBY;
                    bits::WAKEUP
                }
                SensorPower::Off => {
                    pwr_2 |= bits::PWR_ACCEL_STBY;
                    bits::SLEEP
                }
            };
            // El registro maestro solo se toca cuando los otros dos
            // sub-sensores ya están apagados
            if self.conf.gyro_pwr == SensorPower::Off && self.conf.compass_pwr == SensorPower::Off
            {
                bus.write_reg(self.params.addr, mpu::PWR_MGMT_1, pwr_1)?;
            }
            // Standby del acelerómetro sin tocar el resto de bits
            bus.write_reg(self.params.addr, mpu::PWR_MGMT_2, pwr_2)?;
        }

        self.conf.accel_pwr = pwr;
        self.delay.delay_us(self.params.delays.pwr_change_us);

        Ok(())
    }

    /// Enciende o apaga el giroscopio
    pub fn set_gyro_power(&mut self, pwr: SensorPower) -> Result<(), Mpu9250Error> {
        if self.conf.gyro_pwr == pwr {
            return Ok(());
        }

        {
            let mut bus = BusGuard::acquire(&mut self.interface)?;

            let mut pwr_2 = bus.read_reg(self.params.addr, mpu::PWR_MGMT_2)?;
            match pwr {
                SensorPower::On => {
                    // El giroscopio exige el reloj PLL estable
                    bus.write_reg(self.params.addr, mpu::PWR_MGMT_1, bits::CLK_PLL)?;
                    pwr_2 &= !bits::PWR_GYRO_STBY;
                }
                SensorPower::Off => {
                    if self.conf.accel_pwr == SensorPower::Off
                        && self.conf.compass_pwr == SensorPower::Off
                    {
                        // Todos los sensores apagados: dormir el chip
                        bus.write_reg(self.params.addr, mpu::PWR_MGMT_1, bits::SLEEP)?;
                    } else {
                        // Devolver el reloj al oscilador interno
                        bus.write_reg(self.params.addr, mpu::PWR_MGMT_1, bits::WAKEUP)?;
                    }
                    pwr_2 |= bits::PWR_GYRO_STBY;
                }
            }
            bus.write_reg(self.params.addr, mpu::PWR_MGMT_2, pwr_2)?;
        }

        self.conf.gyro_pwr = pwr;
        self.delay.delay_us(self.params.delays.pwr_change_us);

        Ok(())
    }

    /// Enciende o apaga el magnetómetro
    ///
    /// El camino del magnetómetro es distinto al del acelerómetro y el
    /// giroscopio: aquí se conmuta el máster I2C interno y el modo que la
    /// línea esclava 1 escribe en el propio magnetómetro en cada muestra.
    pub fn set_compass_power(&mut self, pwr: SensorPower) -> Result<(), Mpu9250Error> {
        if self.conf.compass_pwr == pwr {
            return Ok(());
        }

        {
            let mut bus = BusGuard::acquire(&mut self.interface)?;

            let mut user_ctrl = bus.read_reg(self.params.addr, mpu::USER_CTRL)?;
            let (pwr_1, s1_do) = match pwr {
                SensorPower::On => {
                    user_ctrl |= bits::I2C_MST_EN;
                    (bits::WAKEUP, ak_val::SINGLE_MEASURE)
                }
                SensorPower::Off => {
                    user_ctrl &= !bits::I2C_MST_EN;
                    (bits::SLEEP, ak_val::POWER_DOWN)
                }
            };
            if self.conf.gyro_pwr == SensorPower::Off && self.conf.accel_pwr == SensorPower::Off {
                bus.write_reg(self.params.addr, mpu::PWR_MGMT_1, pwr_1)?;
            }
            // Modo que la línea esclava 1 escribirá en el magnetómetro
            bus.write_reg(self.params.addr, mpu::I2C_SLV1_DO, s1_do)?;
            bus.write_reg(self.params.addr, mpu::USER_CTRL, user_ctrl)?;
        }

        self.conf.compass_pwr = pwr;
        self.delay.delay_us(self.params.delays.pwr_change_us);

        Ok(())
    }

    /// Lee el giroscopio y lo convierte a grados/segundo
    pub fn read_gyro(&mut self) -> Result<GyroData, Mpu9250Error> {
        let mut data = [0u8; 6];
        {
            let mut bus = BusGuard::acquire(&mut self.interface)?;
            bus.read_regs(self.params.addr, mpu::GYRO_XOUT_H, &mut data)?;
        }

        let [x, y, z] = gyro_raw_to_dps(triplet_from_be(&data), self.conf.gyro_fsr);
        Ok(GyroData { x, y, z })
    }

    /// Lee el acelerómetro y lo convierte a mili-g
    pub fn read_accel(&mut self) -> Result<AccelData, Mpu9250Error> {
        let mut data = [0u8; 6];
        {
            let mut bus = BusGuard::acquire(&mut self.interface)?;
            bus.read_regs(self.params.addr, mpu::ACCEL_XOUT_H, &mut data)?;
        }

        let [x, y, z] = accel_raw_to_mg(triplet_from_be(&data), self.conf.accel_fsr);
        Ok(AccelData { x, y, z })
    }

    /// Lee el sensor de temperatura y lo convierte a miligrados Celsius
    pub fn read_temperature(&mut self) -> Result<i32, Mpu9250Error> {
        let mut data = [0u8; 2];
        {
            let mut bus = BusGuard::acquire(&mut self.interface)?;
            bus.read_regs(self.params.addr, mpu::TEMP_OUT_H, &mut data)?;
        }

        let raw = i16::from_be_bytes([data[0], data[1]]);
        Ok(temp_raw_to_millicelsius(raw))
    }
}
