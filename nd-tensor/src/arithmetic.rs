use super::*;
use num_traits::Float;
use std::ops::{Add, Div, Mul, Neg, Sub};

impl<T: Element> Tensor<T> {
    pub fn add_scalar(&self, value: T) -> Tensor<T> {
        self.map_elements(|x| x + value)
    }

    pub fn sub_scalar(&self, value: T) -> Tensor<T> {
        self.map_elements(|x| x - value)
    }

    /// Computes `value - x` for every element `x`.
    pub fn scalar_sub(&self, value: T) -> Tensor<T> {
        self.map_elements(|x| value - x)
    }

    pub fn mul_scalar(&self, value: T) -> Tensor<T> {
        self.map_elements(|x| x * value)
    }

    pub fn neg(&self) -> Tensor<T> {
        self.map_elements(|x| -x)
    }

    pub fn abs(&self) -> Tensor<T> {
        self.map_elements(|x| x.abs())
    }

    pub fn square(&self) -> Tensor<T> {
        self.map_elements(|x| x * x)
    }

    /// Element-wise sum, broadcasting both operands to a common shape.
    pub fn add(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.zip_elements(other, |x, y| x + y)
    }

    pub fn sub(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.zip_elements(other, |x, y| x - y)
    }

    pub fn mul(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.zip_elements(other, |x, y| x * y)
    }

    pub fn add_scalar_in_place(&mut self, value: T) {
        self.map_in_place(|x| *x += value);
    }

    pub fn sub_scalar_in_place(&mut self, value: T) {
        self.map_in_place(|x| *x -= value);
    }

    pub fn mul_scalar_in_place(&mut self, value: T) {
        self.map_in_place(|x| *x *= value);
    }

    pub fn neg_in_place(&mut self) {
        self.map_in_place(|x| *x = -*x);
    }

    /// Adds `other` into this tensor's buffer region. `other` must broadcast to `self.shape()`.
    pub fn add_in_place(&mut self, other: &Tensor<T>) -> Result<()> {
        self.zip_in_place(other, |x, y| *x += y)
    }

    pub fn sub_in_place(&mut self, other: &Tensor<T>) -> Result<()> {
        self.zip_in_place(other, |x, y| *x -= y)
    }

    pub fn mul_in_place(&mut self, other: &Tensor<T>) -> Result<()> {
        self.zip_in_place(other, |x, y| *x *= y)
    }

    /// Applies `f` to every element, producing a tensor with a fresh buffer.
    pub(crate) fn map_elements(&self, f: impl Fn(T) -> T) -> Tensor<T> {
        let data = self.with_data(|data| data.iter().map(|&x| f(x)).collect());
        Self::from_parts(data, self.strides.clone())
    }

    pub(crate) fn zip_elements(&self, other: &Tensor<T>, f: impl Fn(T, T) -> T) -> Result<Tensor<T>> {
        let zip = |left: &[T], right: &[T]| -> Vec<T> {
            left.iter().zip(right).map(|(&x, &y)| f(x, y)).collect()
        };

        if self.shape() == other.shape() {
            let data = Tensor::with_pair(self, other, zip);
            return Ok(Self::from_parts(data, self.strides.clone()));
        }

        let shape = broadcast_shapes(&[self.shape(), other.shape()])?;
        let left = broadcast_to(self, &shape)?;
        let right = broadcast_to(other, &shape)?;
        let data = Tensor::with_pair(&left, &right, zip);

        Ok(Self::from_parts(data, left.strides.clone()))
    }

    fn map_in_place(&mut self, f: impl Fn(&mut T)) {
        self.with_data_mut(|data| data.iter_mut().for_each(f));
    }

    fn zip_in_place(&mut self, other: &Tensor<T>, f: impl Fn(&mut T, T)) -> Result<()> {
        // the operand is detached first: it may alias the receiver's buffer
        let operand = if other.shape() == self.shape() {
            other.to_vec()
        } else {
            broadcast_to(other, self.shape())?.to_vec()
        };

        self.with_data_mut(|data| {
            data.iter_mut().zip(operand).for_each(|(x, y)| f(x, y));
        });

        Ok(())
    }
}

impl<T: Element + Float> Tensor<T> {
    pub fn div_scalar(&self, value: T) -> Tensor<T> {
        self.map_elements(|x| x / value)
    }

    /// Element-wise quotient, broadcasting both operands to a common shape.
    pub fn div(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.zip_elements(other, |x, y| x / y)
    }

    pub fn div_scalar_in_place(&mut self, value: T) {
        self.map_in_place(|x| *x /= value);
    }

    pub fn div_in_place(&mut self, other: &Tensor<T>) -> Result<()> {
        self.zip_in_place(other, |x, y| *x /= y)
    }
}

impl<T: Element> Add<T> for &Tensor<T> {
    type Output = Tensor<T>;

    fn add(self, rhs: T) -> Tensor<T> {
        self.add_scalar(rhs)
    }
}

impl<T: Element> Sub<T> for &Tensor<T> {
    type Output = Tensor<T>;

    fn sub(self, rhs: T) -> Tensor<T> {
        self.sub_scalar(rhs)
    }
}

impl<T: Element> Mul<T> for &Tensor<T> {
    type Output = Tensor<T>;

    fn mul(self, rhs: T) -> Tensor<T> {
        self.mul_scalar(rhs)
    }
}

impl<T: Element + Float> Div<T> for &Tensor<T> {
    type Output = Tensor<T>;

    fn div(self, rhs: T) -> Tensor<T> {
        self.div_scalar(rhs)
    }
}

impl<T: Element> Neg for &Tensor<T> {
    type Output = Tensor<T>;

    fn neg(self) -> Tensor<T> {
        Tensor::neg(self)
    }
}
