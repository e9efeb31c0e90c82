use crate::{
    error::{Result, TradeblendError},
    types::Trade,
};

/// Long-only cash account driven by boolean entry/exit signals.
pub struct Portfolio {
    pub initial_capital: f64,
    pub cash: f64,
    pub position: Option<Position>,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<f64>,

    // P&L and Drawdown Tracking
    pub realized_pnl: f64,
    pub unrealized_pnl: f64,
    pub total_pnl: f64,
    pub current_position_value: f64,
    pub peak_equity: f64,
    pub max_drawdown: f64,
    pub current_drawdown: f64,

    commission: f64,
    position_fraction: f64,
}

pub struct Position {
    pub entry_bar: usize,
    pub entry_price: f64,
    pub size: f64,
    /// Cash spent including the entry fee
    pub cost_basis: f64,
    pub entry_fees: f64,
}

impl Portfolio {
    /// Frictionless account that commits all cash on entry.
    pub fn new(initial_capital: f64) -> Self {
        Self::with_costs(initial_capital, 0.0, 1.0)
    }

    pub fn with_costs(initial_capital: f64, commission: f64, position_fraction: f64) -> Self {
        Self {
            initial_capital,
            cash: initial_capital,
            position: None,
            trades: Vec::new(),
            equity_curve: vec![initial_capital],
            realized_pnl: 0.0,
            unrealized_pnl: 0.0,
            total_pnl: 0.0,
            current_position_value: 0.0,
            peak_equity: initial_capital,
            max_drawdown: 0.0,
            current_drawdown: 0.0,
            commission,
            position_fraction,
        }
    }

    /// Apply one bar. Conflicting entry and exit on the same bar are ignored.
    pub fn process_bar(&mut self, bar: usize, entry: bool, exit: bool, price: f64) -> Result<()> {
        if !price.is_finite() || price <= 0.0 {
            return Err(TradeblendError::Evaluation(format!(
                "Invalid price {} at bar {}",
                price, bar
            )));
        }

        if entry != exit {
            if self.position.is_none() && entry {
                self.open_position(bar, price)?;
            } else if self.position.is_some() && exit {
                self.close_position(bar, price)?;
            }
        }

        self.calculate_unrealized_pnl(price);
        self.update_drawdown();
        self.equity_curve.push(self.equity());

        Ok(())
    }

    pub fn open_position(&mut self, bar: usize, price: f64) -> Result<()> {
        if self.position.is_some() {
            return Err(TradeblendError::Evaluation(format!(
                "Position already open at bar {}",
                bar
            )));
        }

        let spend = self.cash * self.position_fraction;
        let fees = spend * self.commission;
        let size = (spend - fees) / price;
        self.cash -= spend;

        self.position = Some(Position {
            entry_bar: bar,
            entry_price: price,
            size,
            cost_basis: spend,
            entry_fees: fees,
        });

        Ok(())
    }

    pub fn close_position(&mut self, bar: usize, price: f64) -> Result<()> {
        if let Some(pos) = self.position.take() {
            let gross = pos.size * price;
            let exit_fees = gross * self.commission;
            let proceeds = gross - exit_fees;
            let profit = proceeds - pos.cost_basis;

            self.cash += proceeds;
            self.realized_pnl += profit;

            self.trades.push(Trade {
                entry_bar: pos.entry_bar,
                exit_bar: bar,
                entry_price: pos.entry_price,
                exit_price: price,
                size: pos.size,
                profit,
                fees: pos.entry_fees + exit_fees,
            });
        }

        Ok(())
    }

    pub fn get_trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn get_equity_curve(&self) -> &[f64] {
        &self.equity_curve
    }

    pub fn final_balance(&self) -> f64 {
        self.cash
    }

    /// Mark the open position to `current_price`.
    pub fn calculate_unrealized_pnl(&mut self, current_price: f64) {
        if let Some(position) = &self.position {
            let current_value = position.size * current_price;
            self.unrealized_pnl = current_value - position.cost_basis;
            self.current_position_value = current_value;
        } else {
            self.unrealized_pnl = 0.0;
            self.current_position_value = 0.0;
        }

        self.total_pnl = self.realized_pnl + self.unrealized_pnl;
    }

    /// Cash plus the marked value of the open position.
    pub fn total_value(&self) -> f64 {
        self.cash + self.current_position_value
    }

    pub fn equity(&self) -> f64 {
        self.initial_capital + self.total_pnl
    }

    pub fn update_drawdown(&mut self) {
        let current_equity = self.equity();

        if current_equity > self.peak_equity {
            self.peak_equity = current_equity;
        }

        if self.peak_equity > 0.0 {
            self.current_drawdown = (self.peak_equity - current_equity) / self.peak_equity;

            if self.current_drawdown > self.max_drawdown {
                self.max_drawdown = self.current_drawdown;
            }
        }
    }
}
