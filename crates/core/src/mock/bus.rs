use crate::error::BusError;
use crate::sensor::SensorBus;
use heapless::Vec;

/// One recorded bus transaction
///
/// Writes record their first two data bytes; every device write the node
/// issues is two bytes long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusOp {
    Read { address: u8, register: u8 },
    Write { address: u8, register: u8, data: [u8; 2] },
}

/// Register-map bus with per-address failure injection
///
/// Reading a register that was never set is a NACK.
#[derive(Debug, Default)]
pub struct MockBus {
    registers: Vec<(u8, u8, [u8; 2]), 8>,
    failures: Vec<(u8, BusError), 4>,
    operations: Vec<BusOp, 64>,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) the bytes a register reads back
    pub fn set_register(&mut self, address: u8, register: u8, value: [u8; 2]) {
        if let Some(entry) = self
            .registers
            .iter_mut()
            .find(|(a, r, _)| *a == address && *r == register)
        {
            entry.2 = value;
        } else {
            let _ = self.registers.push((address, register, value));
        }
    }

    /// Make every transaction with `address` fail
    pub fn fail_address(&mut self, address: u8, error: BusError) {
        let _ = self.failures.push((address, error));
    }

    pub fn clear_failures(&mut self) {
        self.failures.clear();
    }

    pub fn operations(&self) -> &[BusOp] {
        &self.operations
    }

    pub fn clear_operations(&mut self) {
        self.operations.clear();
    }

    pub fn write_count(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| matches!(op, BusOp::Write { .. }))
            .count()
    }

    fn failure(&self, address: u8) -> Option<BusError> {
        self.failures
            .iter()
            .find(|(a, _)| *a == address)
            .map(|(_, e)| *e)
    }
}

impl SensorBus for MockBus {
    async fn read(&mut self, address: u8, register: u8, buffer: &mut [u8]) -> Result<(), BusError> {
        let _ = self.operations.push(BusOp::Read { address, register });
        if let Some(error) = self.failure(address) {
            return Err(error);
        }
        let (_, _, value) = self
            .registers
            .iter()
            .find(|(a, r, _)| *a == address && *r == register)
            .ok_or(BusError::Nack)?;
        buffer.fill(0);
        let n = buffer.len().min(value.len());
        buffer[..n].copy_from_slice(&value[..n]);
        Ok(())
    }

    async fn write(&mut self, address: u8, register: u8, data: &[u8]) -> Result<(), BusError> {
        let mut recorded = [0u8; 2];
        let n = data.len().min(2);
        recorded[..n].copy_from_slice(&data[..n]);
        let _ = self.operations.push(BusOp::Write {
            address,
            register,
            data: recorded,
        });
        match self.failure(address) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
