//! Módulo de abstracción para el transporte de registros del MPU9250
//!
//! El driver nunca habla con el bus directamente: todas las secuencias de
//! registros pasan por el trait [`Interface`], que modela el transporte como
//! un recurso de acceso exclusivo (adquirir / operar / liberar). La guardia
//! [`BusGuard`] encapsula ese protocolo y garantiza la liberación en todos
//! los caminos de salida, incluidos los retornos tempranos por error.

use crate::device::Mpu9250Error;
use embedded_hal::i2c::I2c;

/// Error genérico para interfaces de comunicación
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterfaceError<E> {
    /// El transporte rechazó la adquisición exclusiva
    Busy,
    /// Error de comunicación I2C
    I2cError(E),
    /// Parámetro inválido
    InvalidParameter,
}

#[cfg(feature = "linux")]
impl From<linux_embedded_hal::I2CError> for InterfaceError<linux_embedded_hal::I2CError> {
    fn from(error: linux_embedded_hal::I2CError) -> Self {
        InterfaceError::I2cError(error)
    }
}

/// Trait para abstraer la comunicación con el dispositivo MPU9250
///
/// A diferencia de un `I2c` plano, el trait expone la dirección del
/// periférico en cada operación: el driver habla tanto con el die principal
/// como con el magnetómetro (en modo bypass) a través del mismo transporte.
pub trait Interface {
    /// Tipo de error que puede producir la interfaz
    type Error;

    /// Adquiere acceso exclusivo al transporte
    fn acquire(&mut self) -> Result<(), Self::Error>;

    /// Libera el acceso exclusivo
    fn release(&mut self);

    /// Lee uno o más registros consecutivos a partir de `reg`
    fn read_reg(&mut self, addr: u8, reg: u8, data: &mut [u8]) -> Result<(), Self::Error>;

    /// Escribe uno o más registros consecutivos a partir de `reg`
    fn write_reg(&mut self, addr: u8, reg: u8, data: &[u8]) -> Result<(), Self::Error>;
}

/// Implementación de Interface para I2C
pub struct I2cInterface<I2C> {
    i2c: I2C,
}

impl<I2C, E> I2cInterface<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Crea una nueva interfaz I2C
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Consume la interfaz y devuelve el dispositivo I2C subyacente
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> Interface for I2cInterface<I2C>
where
    I2C: I2c<Error = E>,
{
    type Error = InterfaceError<E>;

    fn acquire(&mut self) -> Result<(), Self::Error> {
        // El periférico I2C es de uso exclusivo por construcción
        Ok(())
    }

    fn release(&mut self) {}

    fn read_reg(&mut self, addr: u8, reg: u8, data: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c
            .write_read(addr, &[reg], data)
            .map_err(InterfaceError::I2cError)
    }

    fn write_reg(&mut self, addr: u8, reg: u8, data: &[u8]) -> Result<(), Self::Error> {
        let mut buffer = [0u8; 17]; // Buffer suficiente para la mayoría de operaciones
        buffer[0] = reg;

        if data.len() > 16 {
            return Err(InterfaceError::InvalidParameter);
        }

        buffer[1..data.len() + 1].copy_from_slice(data);

        self.i2c
            .write(addr, &buffer[0..data.len() + 1])
            .map_err(InterfaceError::I2cError)
    }
}

/// Guardia de adquisición exclusiva del transporte
///
/// Se construye con [`BusGuard::acquire`] al principio de cada operación
/// pública y libera el transporte al salir del ámbito. Las sub-secuencias
/// que deben ejecutarse dentro de una adquisición ya existente (bypass,
/// inicialización del compás) reciben `&mut BusGuard` en lugar de volver a
/// adquirir, de modo que la doble adquisición no es representable.
pub struct BusGuard<'a, I: Interface> {
    iface: &'a mut I,
}

impl<'a, I: Interface> BusGuard<'a, I> {
    /// Intenta adquirir el transporte; falla con `BusUnavailable` si el
    /// recurso no está disponible
    pub fn acquire(iface: &'a mut I) -> Result<Self, Mpu9250Error> {
        iface.acquire().map_err(|_| Mpu9250Error::BusUnavailable)?;
        Ok(Self { iface })
    }

    /// Lee un único registro
    pub fn read_reg(&mut self, addr: u8, reg: u8) -> Result<u8, Mpu9250Error> {
        let mut data = [0u8];
        self.iface
            .read_reg(addr, reg, &mut data)
            .map_err(Mpu9250Error::from_error)?;
        Ok(data[0])
    }

    /// Lee varios registros consecutivos
    pub fn read_regs(&mut self, addr: u8, reg: u8, data: &mut [u8]) -> Result<(), Mpu9250Error> {
        self.iface
            .read_reg(addr, reg, data)
            .map_err(Mpu9250Error::from_error)
    }

    /// Escribe un único registro
    pub fn write_reg(&mut self, addr: u8, reg: u8, value: u8) -> Result<(), Mpu9250Error> {
        self.iface
            .write_reg(addr, reg, &[value])
            .map_err(Mpu9250Error::from_error)
    }

    /// Lee un registro, aplica `f` y escribe el resultado
    pub fn modify_reg<F>(&mut self, addr: u8, reg: u8, f: F) -> Result<(), Mpu9250Error>
    where
        F: FnOnce(u8) -> u8,
    {
        let value = self.read_reg(addr, reg)?;
        self.write_reg(addr, reg, f(value))
    }
}

impl<I: Interface> Drop for BusGuard<'_, I> {
    fn drop(&mut self) {
        self.iface.release();
    }
}
