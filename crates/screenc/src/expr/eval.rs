use super::{
    Environment, ExprError, Value,
    parser::{self, BinOp, Expr},
};

/// Evaluates `text` to an integer.
///
/// Plain integer literals skip the expression parser.
pub(crate) fn eval_int(text: &str, env: &Environment) -> Result<i32, ExprError> {
    if let Ok(value) = text.trim().parse::<i32>() {
        return Ok(value);
    }

    match evaluate(text, env)? {
        Value::Int(value) => Ok(value),
        other => Err(ExprError::Type {
            expr: text.to_string(),
            message: format!("expected an integer, found a {}", other.type_name()),
        }),
    }
}

/// Evaluates `text` to a string. Integers are formatted in decimal.
pub(crate) fn eval_string(text: &str, env: &Environment) -> Result<String, ExprError> {
    match evaluate(text, env)? {
        Value::Int(value) => Ok(value.to_string()),
        Value::Str(value) => Ok(value),
        other => Err(ExprError::Type {
            expr: text.to_string(),
            message: format!("expected a string, found a {}", other.type_name()),
        }),
    }
}

fn evaluate(text: &str, env: &Environment) -> Result<Value, ExprError> {
    let expr = parser::parse(text)?;
    Evaluator { text, env }.eval(&expr)
}

struct Evaluator<'a> {
    text: &'a str,
    env: &'a Environment,
}

impl Evaluator<'_> {
    fn type_error(&self, message: String) -> ExprError {
        ExprError::Type {
            expr: self.text.to_string(),
            message,
        }
    }

    fn overflow(&self) -> ExprError {
        ExprError::Overflow {
            expr: self.text.to_string(),
        }
    }

    fn lookup(&self, name: &str) -> Result<&Value, ExprError> {
        self.env
            .get(name)
            .ok_or_else(|| ExprError::UndefinedVariable {
                expr: self.text.to_string(),
                name: name.to_string(),
            })
    }

    fn int(&self, value: Value) -> Result<i32, ExprError> {
        match value {
            Value::Int(v) => Ok(v),
            other => Err(self.type_error(format!(
                "expected an integer operand, found a {}",
                other.type_name()
            ))),
        }
    }

    fn eval(&self, expr: &Expr) -> Result<Value, ExprError> {
        match expr {
            Expr::Int(v) => Ok(Value::Int(*v)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Var(name) => self.lookup(name).cloned(),
            Expr::Member { name, member } => match (self.lookup(name)?, member.as_str()) {
                (Value::Size { width, .. }, "Width") => Ok(Value::Int(*width)),
                (Value::Size { height, .. }, "Height") => Ok(Value::Int(*height)),
                _ => Err(self.type_error(format!("'{name}' has no member '{member}'"))),
            },
            Expr::Neg(inner) => {
                let value = self.eval(inner)?;
                let value = self.int(value)?;
                value
                    .checked_neg()
                    .map(Value::Int)
                    .ok_or_else(|| self.overflow())
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                self.binary(*op, lhs, rhs)
            }
        }
    }

    fn binary(&self, op: BinOp, lhs: Value, rhs: Value) -> Result<Value, ExprError> {
        if op == BinOp::Add && (matches!(lhs, Value::Str(_)) || matches!(rhs, Value::Str(_))) {
            if matches!(lhs, Value::Size { .. }) || matches!(rhs, Value::Size { .. }) {
                return Err(self.type_error("cannot join a text size to a string".to_string()));
            }
            return Ok(Value::Str(format!("{lhs}{rhs}")));
        }

        let lhs = self.int(lhs)?;
        let rhs = self.int(rhs)?;
        let result = match op {
            BinOp::Add => lhs.checked_add(rhs),
            BinOp::Sub => lhs.checked_sub(rhs),
            BinOp::Mul => lhs.checked_mul(rhs),
            BinOp::Div | BinOp::Rem if rhs == 0 => {
                return Err(ExprError::DivisionByZero {
                    expr: self.text.to_string(),
                });
            }
            BinOp::Div => lhs.checked_div(rhs),
            BinOp::Rem => lhs.checked_rem(rhs),
        };
        result.map(Value::Int).ok_or_else(|| self.overflow())
    }
}
