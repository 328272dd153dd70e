//! Interfaz simulada para probar el driver MPU9250 sin hardware
//!
//! Mantiene un mapa de registros por dirección de periférico (die principal
//! y magnetómetro), un registro de operaciones para verificar secuencias y
//! banderas de inyección de fallos.

use mpu9250_rs::interface::Interface;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Operaciones registradas sobre la interfaz simulada
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Adquisición exclusiva del transporte
    Acquire,
    /// Liberación del transporte
    Release,
    /// Lectura burst a partir de un registro
    ReadReg {
        /// Dirección del periférico
        addr: u8,
        /// Registro inicial
        reg: u8,
        /// Número de bytes leídos
        len: usize,
    },
    /// Escritura de un byte en un registro
    WriteReg {
        /// Dirección del periférico
        addr: u8,
        /// Registro escrito
        reg: u8,
        /// Valor escrito
        value: u8,
    },
}

#[derive(Debug)]
struct MockState {
    /// Valores simulados de registros: (dirección, registro) -> valor
    registers: HashMap<(u8, u8), u8>,

    /// Registro de operaciones para verificación
    operations: Vec<Operation>,

    /// Banderas de inyección de fallos
    fail_acquire: bool,
    fail_next_read: bool,
    fail_next_write: bool,
}

impl MockState {
    fn new() -> Self {
        let mut state = Self {
            registers: HashMap::new(),
            operations: Vec::new(),
            fail_acquire: false,
            fail_next_read: false,
            fail_next_write: false,
        };

        // Identidad del AK8963 y ajustes de fábrica neutros
        state.registers.insert((0x0C, 0x00), 0x48);
        state.registers.insert((0x0C, 0x10), 128);
        state.registers.insert((0x0C, 0x11), 128);
        state.registers.insert((0x0C, 0x12), 128);

        state
    }
}

/// Error simulado del transporte
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockError {
    /// El transporte está ocupado
    Busy,
    /// Error de comunicación simulado
    Communication,
}

/// Interfaz simulada; clonar comparte el mismo estado interno
#[derive(Clone)]
pub struct MockInterface {
    state: Rc<RefCell<MockState>>,
}

impl MockInterface {
    /// Crea una interfaz simulada con los valores por defecto
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(MockState::new())),
        }
    }

    /// Fija el valor de un registro
    pub fn set_register(&self, addr: u8, reg: u8, value: u8) {
        self.state.borrow_mut().registers.insert((addr, reg), value);
    }

    /// Fija un bloque de registros consecutivos
    pub fn set_register_block(&self, addr: u8, start: u8, values: &[u8]) {
        let mut state = self.state.borrow_mut();
        for (i, &value) in values.iter().enumerate() {
            state
                .registers
                .insert((addr, start.wrapping_add(i as u8)), value);
        }
    }

    /// Valor actual de un registro (0 si nunca se escribió)
    pub fn get_register(&self, addr: u8, reg: u8) -> u8 {
        self.state
            .borrow()
            .registers
            .get(&(addr, reg))
            .copied()
            .unwrap_or(0)
    }

    /// Copia del registro de operaciones
    pub fn operations(&self) -> Vec<Operation> {
        self.state.borrow().operations.clone()
    }

    /// Limpia el registro de operaciones
    pub fn clear_operations(&self) {
        self.state.borrow_mut().operations.clear();
    }

    /// Todas las escrituras registradas sobre un registro, en orden
    pub fn writes_to(&self, addr: u8, reg: u8) -> Vec<u8> {
        self.state
            .borrow()
            .operations
            .iter()
            .filter_map(|op| match op {
                Operation::WriteReg {
                    addr: a,
                    reg: r,
                    value,
                } if *a == addr && *r == reg => Some(*value),
                _ => None,
            })
            .collect()
    }

    /// Hace fallar todas las adquisiciones hasta nueva orden
    pub fn fail_acquire(&self, enable: bool) {
        self.state.borrow_mut().fail_acquire = enable;
    }

    /// Inyecta un fallo en la siguiente lectura
    pub fn fail_next_read(&self) {
        self.state.borrow_mut().fail_next_read = true;
    }

    /// Inyecta un fallo en la siguiente escritura
    pub fn fail_next_write(&self) {
        self.state.borrow_mut().fail_next_write = true;
    }
}

impl Default for MockInterface {
    fn default() -> Self {
        Self::new()
    }
}

impl Interface for MockInterface {
    type Error = MockError;

    fn acquire(&mut self) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.fail_acquire {
            return Err(MockError::Busy);
        }
        state.operations.push(Operation::Acquire);
        Ok(())
    }

    fn release(&mut self) {
        self.state.borrow_mut().operations.push(Operation::Release);
    }

    fn read_reg(&mut self, addr: u8, reg: u8, data: &mut [u8]) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();

        if state.fail_next_read {
            state.fail_next_read = false;
            return Err(MockError::Communication);
        }

        for (i, byte) in data.iter_mut().enumerate() {
            let reg_addr = reg.wrapping_add(i as u8);
            *byte = state
                .registers
                .get(&(addr, reg_addr))
                .copied()
                .unwrap_or(0);
        }

        state.operations.push(Operation::ReadReg {
            addr,
            reg,
            len: data.len(),
        });

        Ok(())
    }

    fn write_reg(&mut self, addr: u8, reg: u8, data: &[u8]) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();

        if state.fail_next_write {
            state.fail_next_write = false;
            return Err(MockError::Communication);
        }

        for (i, &byte) in data.iter().enumerate() {
            let reg_addr = reg.wrapping_add(i as u8);
            state.registers.insert((addr, reg_addr), byte);
            state.operations.push(Operation::WriteReg {
                addr,
                reg: reg_addr,
                value: byte,
            });
        }

        Ok(())
    }
}

/// Retardo nulo para los tests: el driver exige un `DelayNs` pero aquí no
/// hay hardware al que esperar
pub struct MockDelay;

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
