use super::{CcFlag, ExecState, StackPointer, Turbo9, read_word, write_word};
use crate::core::{Bus, BusMaster};

impl Turbo9 {
    fn stack_pointer_mut(&mut self, stack: StackPointer) -> &mut u16 {
        match stack {
            StackPointer::S => &mut self.s,
            StackPointer::U => &mut self.u,
        }
    }

    fn push_byte<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        stack: StackPointer,
        val: u8,
    ) {
        let sp = self.stack_pointer_mut(stack);
        *sp = sp.wrapping_sub(1);
        let addr = *sp;
        bus.write(BusMaster::Cpu, addr, val);
    }

    /// Push low byte first so the high byte ends up at the lower address.
    fn push_word<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        stack: StackPointer,
        val: u16,
    ) {
        let sp = self.stack_pointer_mut(stack);
        *sp = sp.wrapping_sub(2);
        let addr = *sp;
        write_word(bus, addr, val);
    }

    fn pull_byte<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        stack: StackPointer,
    ) -> u8 {
        let sp = self.stack_pointer_mut(stack);
        let addr = *sp;
        *sp = sp.wrapping_add(1);
        bus.read(BusMaster::Cpu, addr)
    }

    fn pull_word<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        stack: StackPointer,
    ) -> u16 {
        let sp = self.stack_pointer_mut(stack);
        let addr = *sp;
        *sp = sp.wrapping_add(2);
        read_word(bus, addr)
    }

    pub(crate) fn push_word_s<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        val: u16,
    ) {
        self.push_word(bus, StackPointer::S, val);
    }

    pub(crate) fn pull_word_s<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
    ) -> u16 {
        self.pull_word(bus, StackPointer::S)
    }

    /// Stack the entire machine state on S with E set:
    /// PC, U, Y, X, DP, B, A, CC (CC ends up on top).
    pub(crate) fn push_entire_state<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
    ) {
        self.set_flag(CcFlag::E, true);
        self.push_word(bus, StackPointer::S, self.pc);
        self.push_word(bus, StackPointer::S, self.u);
        self.push_word(bus, StackPointer::S, self.y);
        self.push_word(bus, StackPointer::S, self.x);
        self.push_byte(bus, StackPointer::S, self.dp);
        self.push_byte(bus, StackPointer::S, self.b);
        self.push_byte(bus, StackPointer::S, self.a);
        self.push_byte(bus, StackPointer::S, self.cc);
    }

    /// FIRQ stacking: PC and CC only, with E cleared.
    pub(crate) fn push_fast_state<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
    ) {
        self.set_flag(CcFlag::E, false);
        self.push_word(bus, StackPointer::S, self.pc);
        self.push_byte(bus, StackPointer::S, self.cc);
    }

    /// PSHS/PSHU. Postbyte bits, pushed high to low:
    /// PC(7), U/S(6), Y(5), X(4), DP(3), B(2), A(1), CC(0).
    /// One extra cycle per byte pushed.
    pub(crate) fn op_push<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        stack: StackPointer,
    ) -> u32 {
        let mask = self.read_operand8(bus);
        let other = match stack {
            StackPointer::S => self.u,
            StackPointer::U => self.s,
        };
        let mut bytes = 0;
        if mask & 0x80 != 0 {
            self.push_word(bus, stack, self.pc);
            bytes += 2;
        }
        if mask & 0x40 != 0 {
            self.push_word(bus, stack, other);
            bytes += 2;
        }
        if mask & 0x20 != 0 {
            self.push_word(bus, stack, self.y);
            bytes += 2;
        }
        if mask & 0x10 != 0 {
            self.push_word(bus, stack, self.x);
            bytes += 2;
        }
        if mask & 0x08 != 0 {
            self.push_byte(bus, stack, self.dp);
            bytes += 1;
        }
        if mask & 0x04 != 0 {
            self.push_byte(bus, stack, self.b);
            bytes += 1;
        }
        if mask & 0x02 != 0 {
            self.push_byte(bus, stack, self.a);
            bytes += 1;
        }
        if mask & 0x01 != 0 {
            self.push_byte(bus, stack, self.cc);
            bytes += 1;
        }
        bytes
    }

    /// PULS/PULU. Pulled low to high: CC, A, B, DP, X, Y, U/S, PC.
    pub(crate) fn op_pull<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        stack: StackPointer,
    ) -> u32 {
        let mask = self.read_operand8(bus);
        let mut bytes = 0;
        if mask & 0x01 != 0 {
            self.cc = self.pull_byte(bus, stack);
            bytes += 1;
        }
        if mask & 0x02 != 0 {
            self.a = self.pull_byte(bus, stack);
            bytes += 1;
        }
        if mask & 0x04 != 0 {
            self.b = self.pull_byte(bus, stack);
            bytes += 1;
        }
        if mask & 0x08 != 0 {
            self.dp = self.pull_byte(bus, stack);
            bytes += 1;
        }
        if mask & 0x10 != 0 {
            self.x = self.pull_word(bus, stack);
            bytes += 2;
        }
        if mask & 0x20 != 0 {
            self.y = self.pull_word(bus, stack);
            bytes += 2;
        }
        if mask & 0x40 != 0 {
            let val = self.pull_word(bus, stack);
            match stack {
                StackPointer::S => self.u = val,
                StackPointer::U => self.s = val,
            }
            bytes += 2;
        }
        if mask & 0x80 != 0 {
            self.pc = self.pull_word(bus, stack);
            bytes += 2;
        }
        bytes
    }

    /// RTI: pull CC; if E is set pull the rest of the entire state (9 extra
    /// cycles); then pull PC.
    pub(crate) fn op_rti<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
    ) -> u32 {
        self.cc = self.pull_byte(bus, StackPointer::S);
        let entire = self.flag(CcFlag::E);
        if entire {
            self.a = self.pull_byte(bus, StackPointer::S);
            self.b = self.pull_byte(bus, StackPointer::S);
            self.dp = self.pull_byte(bus, StackPointer::S);
            self.x = self.pull_word(bus, StackPointer::S);
            self.y = self.pull_word(bus, StackPointer::S);
            self.u = self.pull_word(bus, StackPointer::S);
        }
        self.pc = self.pull_word(bus, StackPointer::S);
        if entire { 9 } else { 0 }
    }

    /// SWI/SWI2/SWI3: stack the entire state and vector. Only SWI masks
    /// IRQ and FIRQ.
    pub(crate) fn op_swi<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        vector: u16,
        mask_interrupts: bool,
    ) -> u32 {
        self.push_entire_state(bus);
        if mask_interrupts {
            self.set_flag(CcFlag::I, true);
            self.set_flag(CcFlag::F, true);
        }
        self.pc = read_word(bus, vector);
        0
    }

    /// CWAI: CC &= imm, stack the entire state, then wait for an interrupt.
    /// The interrupt that ends the wait does not stack again.
    pub(crate) fn op_cwai<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
    ) -> u32 {
        self.cc &= self.read_operand8(bus);
        self.push_entire_state(bus);
        self.state = ExecState::CwaiWait;
        0
    }

    /// SYNC: halt until any interrupt line is asserted.
    pub(crate) fn op_sync(&mut self) -> u32 {
        self.state = ExecState::SyncWait;
        0
    }
}
