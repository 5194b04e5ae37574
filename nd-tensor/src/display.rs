use super::*;
use std::fmt;

impl<T: Element> fmt::Display for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.to_vec();
        write_nested(f, self.shape(), &data)
    }
}

/// Writes `data` as nested bracketed rows, one bracket level per axis.
fn write_nested<T: fmt::Display>(f: &mut fmt::Formatter<'_>, shape: &[usize], data: &[T]) -> fmt::Result {
    match shape {
        [] => match data.first() {
            Some(value) => write!(f, "{value}"),
            None => write!(f, "[]"),
        },
        [_] => {
            write!(f, "[")?;
            for (i, value) in data.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{value}")?;
            }
            write!(f, "]")
        }
        [first, rest @ ..] => {
            let step: usize = rest.iter().product();
            write!(f, "[")?;
            for i in 0..*first {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_nested(f, rest, &data[i * step..(i + 1) * step])?;
            }
            write!(f, "]")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_nested_rows() -> Result<()> {
        let tensor = Tensor::<i32>::arange(6)?.view(&[2, 3])?;
        assert_eq!(tensor.to_string(), "[[0, 1, 2], [3, 4, 5]]");

        let cube = Tensor::<i32>::arange(8)?.view(&[2, 2, 2])?;
        assert_eq!(cube.to_string(), "[[[0, 1], [2, 3]], [[4, 5], [6, 7]]]");

        assert_eq!(Tensor::scalar(1.5_f64).to_string(), "1.5");
        assert_eq!(Tensor::<f32>::zeros(&[0]).to_string(), "[]");
        assert_eq!(Tensor::<f32>::zeros(&[2, 0]).to_string(), "[[], []]");

        Ok(())
    }
}
